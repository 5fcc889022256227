//! SQL statement logging through `tracing`.

use crate::plan::{Statement, StatementKind};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Level names as they appear in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Emits every rendered statement before it reaches the executor.
///
/// Events use the `structq.sql` target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlLogConfig {
    pub enabled: bool,
    /// Tracing event level to emit at.
    pub level: LogLevel,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogConfig {
    fn truncate_sql<'s>(&self, sql: &'s str) -> std::borrow::Cow<'s, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }

    pub(crate) fn emit(&self, kind: StatementKind, statement: &Statement) {
        if !self.enabled {
            return;
        }

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(statement.sql());
        emit_at_level!(
            Level::from(self.level),
            target: "structq.sql",
            kind = ?kind,
            param_count = statement.args().len(),
            sql = %sql,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let config = SqlLogConfig {
            max_sql_length: Some(4),
            ..SqlLogConfig::default()
        };
        assert_eq!(config.truncate_sql("SELECT 1"), "SELE...");
        assert_eq!(config.truncate_sql("abé"), "abé");
        assert_eq!(config.truncate_sql("abcé1"), "abc...");
    }

    #[test]
    fn level_names_deserialize() {
        let config: SqlLogConfig =
            serde_json::from_str(r#"{"level":"trace","max_sql_length":null}"#).unwrap();
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.max_sql_length, None);
        assert!(config.enabled);
    }
}
