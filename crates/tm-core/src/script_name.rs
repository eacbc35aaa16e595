//! Script file name parsing.
//!
//! A script file is named `<version>_<description>.<ext>` where `<version>` is
//! a 14-digit `yyyyMMddHHmmss` timestamp. The character at index 14 must be an
//! underscore. Parsing yields a tagged [`ScriptName`] so that selection logic
//! never has to deal with raw strings.

use crate::error::{CoreError, CoreResult};
use crate::version::{Version, VERSION_LEN};

/// A successfully parsed script file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScriptName {
    /// Version prefix
    pub version: Version,

    /// Text between the underscore and the extension (may be empty)
    pub description: String,

    /// File extension without the dot, if present
    pub extension: Option<String>,

    /// The full original file name
    pub raw: String,
}

/// Result of parsing a script file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptName {
    /// Name follows `<version>_<description>.<ext>`
    Parsed(ParsedScriptName),
    /// Name violates the version-prefix invariant
    Invalid { raw: String, reason: String },
}

impl ScriptName {
    /// Convert into a `Result`, turning an invalid name into
    /// [`CoreError::MalformedScriptName`].
    pub fn into_result(self) -> CoreResult<ParsedScriptName> {
        match self {
            ScriptName::Parsed(parsed) => Ok(parsed),
            ScriptName::Invalid { raw, reason } => {
                Err(CoreError::MalformedScriptName { name: raw, reason })
            }
        }
    }

    /// Whether the name parsed successfully.
    pub fn is_valid(&self) -> bool {
        matches!(self, ScriptName::Parsed(_))
    }
}

/// Parse a script file name.
pub fn parse_script_name(raw: &str) -> ScriptName {
    let invalid = |reason: String| ScriptName::Invalid {
        raw: raw.to_string(),
        reason,
    };

    if raw.len() <= VERSION_LEN {
        return invalid(format!(
            "name must be at least {} characters long",
            VERSION_LEN + 1
        ));
    }
    if raw.as_bytes()[VERSION_LEN] != b'_' {
        return invalid(format!(
            "expected an underscore '_' at position {} after the version prefix",
            VERSION_LEN
        ));
    }

    // Byte VERSION_LEN is ASCII, so this slice is on a char boundary
    let version = match Version::parse(&raw[..VERSION_LEN]) {
        Ok(v) => v,
        Err(e) => return invalid(e.to_string()),
    };

    let rest = &raw[VERSION_LEN + 1..];
    let (description, extension) = match rest.rfind('.') {
        Some(pos) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
        None => (rest, None),
    };

    ScriptName::Parsed(ParsedScriptName {
        version,
        description: description.to_string(),
        extension,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
#[path = "script_name_test.rs"]
mod tests;
