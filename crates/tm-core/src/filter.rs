//! Version-based selection of scripts still to be applied.

use crate::error::{CoreError, CoreResult};
use crate::script::MigrationScript;
use crate::version::Version;
use std::collections::HashMap;

/// A script chosen for execution together with its parsed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedScript {
    /// Version parsed from the script name
    pub version: Version,

    /// The script itself
    pub script: MigrationScript,
}

impl SelectedScript {
    /// File name of the selected script.
    pub fn name(&self) -> &str {
        self.script.name()
    }
}

/// Select the scripts whose version is strictly after `last_applied`,
/// sorted ascending by version.
///
/// Every name in `scripts` is validated before anything is selected. A single
/// malformed name fails the whole pass, and so does a version shared by two
/// files, since there is no defined order between them.
pub fn select(
    scripts: &[MigrationScript],
    last_applied: Version,
) -> CoreResult<Vec<SelectedScript>> {
    let mut parsed = Vec::with_capacity(scripts.len());
    for script in scripts {
        let name = script.parse_name().into_result()?;
        parsed.push(SelectedScript {
            version: name.version,
            script: script.clone(),
        });
    }

    reject_duplicates(&parsed)?;

    let mut selected: Vec<SelectedScript> = parsed
        .into_iter()
        .filter(|s| s.version > last_applied)
        .collect();
    selected.sort_by_key(|s| s.version);

    log::debug!(
        "Selected {} of {} script(s) after {}",
        selected.len(),
        scripts.len(),
        last_applied
    );
    Ok(selected)
}

fn reject_duplicates(parsed: &[SelectedScript]) -> CoreResult<()> {
    let mut seen: HashMap<Version, &str> = HashMap::with_capacity(parsed.len());
    for candidate in parsed {
        if let Some(first) = seen.insert(candidate.version, candidate.name()) {
            let (first, second) = ordered_pair(first, candidate.name());
            return Err(CoreError::DuplicateVersion {
                version: candidate.version.to_string(),
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    }
    Ok(())
}

/// Order two names so error messages do not depend on directory order.
fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
