//! Target descriptors: a name plus the provider of its connection.

use std::fmt;
use std::path::Path;
use tm_core::Config;
use tm_db::{DuckDbProvider, TargetProvider};

/// One independently migrated database.
pub struct Target {
    name: String,
    provider: Box<dyn TargetProvider>,
}

impl Target {
    /// Create a target named `name` that connects through `provider`.
    pub fn new(name: impl Into<String>, provider: impl TargetProvider + 'static) -> Self {
        Self {
            name: name.into(),
            provider: Box::new(provider),
        }
    }

    /// Target name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connection provider.
    pub fn provider(&self) -> &dyn TargetProvider {
        self.provider.as_ref()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("provider", &self.provider.describe())
            .finish()
    }
}

/// Build DuckDB targets for every configured target, in config order.
///
/// Relative database paths resolve against `root`. Each provider provisions
/// the state table on connect.
pub fn targets_from_config(config: &Config, root: &Path) -> Vec<Target> {
    config
        .targets
        .iter()
        .map(|t| {
            let provider =
                DuckDbProvider::new(t.resolve_path(root)).with_state_table(&config.state_table);
            Target::new(&t.name, provider)
        })
        .collect()
}
