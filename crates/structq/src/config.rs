//! `DbMap` configuration.

use crate::dialect::DialectKind;
use crate::extension::ExtensionKind;
use crate::logging::SqlLogConfig;
use serde::{Deserialize, Serialize};

/// Settings for a [`DbMap`](crate::DbMap).
///
/// Every field has a default, so a partial document is enough:
///
/// ```ignore
/// let config: DbMapConfig = serde_json::from_str(r#"{
///     "dialect": "postgres",
///     "extensions": ["postgres"],
///     "log": { "level": "info" }
/// }"#)?;
/// let db = DbMap::from_config(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbMapConfig {
    pub dialect: DialectKind,
    /// Query extensions callers may switch to with `Query::postgres()` and
    /// friends. Nothing is enabled implicitly.
    pub extensions: Vec<ExtensionKind>,
    pub log: SqlLogConfig,
}

impl DbMapConfig {
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_extension(mut self, extension: ExtensionKind) -> Self {
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn empty_document_uses_defaults() {
        let config: DbMapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DbMapConfig::default());
        assert_eq!(config.dialect, DialectKind::Postgres);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn full_document() {
        let config: DbMapConfig = serde_json::from_str(
            r#"{"dialect":"mysql","extensions":["postgres"],"log":{"enabled":false,"level":"warn"}}"#,
        )
        .unwrap();
        assert_eq!(config.dialect, DialectKind::Mysql);
        assert_eq!(config.extensions, vec![ExtensionKind::Postgres]);
        assert!(!config.log.enabled);
        assert_eq!(config.log.level, LogLevel::Warn);
    }

    #[test]
    fn with_extension_is_idempotent() {
        let config = DbMapConfig::new(DialectKind::Postgres)
            .with_extension(ExtensionKind::Postgres)
            .with_extension(ExtensionKind::Postgres);
        assert_eq!(config.extensions.len(), 1);
    }
}
