use crate::error::DialectTableError;
use crate::types::Dialect;

/// The SQL a table runs for one dialect.
///
/// Placeholders follow the driver of the dialect (`?` or `?N` for `SQLite`, `$N` for
/// `PostgreSQL`); nothing here rewrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    /// Finds a row by its key tuple; the first selected column must be the id.
    pub select_by_key: String,
    /// Inserts a row from the key tuple.
    pub insert: String,
    /// Fetches a row by id. The selected columns are up to the table.
    pub select_by_id: String,
    /// Rewrites a row; key tuple values are bound first, the id last.
    pub update: String,
    /// Deletes a row by id.
    pub delete: String,
    /// DDL run in order by `create_schema`. Expected to be guarded with `IF NOT EXISTS`.
    pub create_schema: Vec<String>,
    /// DDL run in order by `drop_schema`. Expected to be guarded with `IF EXISTS`.
    pub drop_schema: Vec<String>,
}

impl Statements {
    fn validate(&self) -> Result<(), DialectTableError> {
        let single = [
            ("select_by_key", &self.select_by_key),
            ("insert", &self.insert),
            ("select_by_id", &self.select_by_id),
            ("update", &self.update),
            ("delete", &self.delete),
        ];
        for (name, sql) in single {
            if sql.trim().is_empty() {
                return Err(DialectTableError::ConfigError(format!(
                    "{name} statement is empty"
                )));
            }
        }

        let lists = [
            ("create_schema", &self.create_schema),
            ("drop_schema", &self.drop_schema),
        ];
        for (name, list) in lists {
            if let Some(pos) = list.iter().position(|sql| sql.trim().is_empty()) {
                return Err(DialectTableError::ConfigError(format!(
                    "{name} statement {pos} is empty"
                )));
            }
        }
        Ok(())
    }
}

/// How the id of a freshly inserted row is learned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdRecovery {
    /// Read the driver's last-inserted rowid for the connection.
    LastInsertRowId,
    /// Run this query on the same session; its single row carries the id in the first column.
    SequenceCurrentValue(String),
}

/// Statements for exactly one dialect. The variant decides the dialect of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialectStatements {
    Sqlite(Statements),
    Postgres {
        statements: Statements,
        /// e.g. `SELECT CURRVAL('labels_seq')`
        current_value: String,
    },
}

impl DialectStatements {
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        match self {
            DialectStatements::Sqlite(_) => Dialect::Sqlite,
            DialectStatements::Postgres { .. } => Dialect::Postgres,
        }
    }

    #[must_use]
    pub fn statements(&self) -> &Statements {
        match self {
            DialectStatements::Sqlite(statements)
            | DialectStatements::Postgres { statements, .. } => statements,
        }
    }

    #[must_use]
    pub fn id_recovery(&self) -> IdRecovery {
        match self {
            DialectStatements::Sqlite(_) => IdRecovery::LastInsertRowId,
            DialectStatements::Postgres { current_value, .. } => {
                IdRecovery::SequenceCurrentValue(current_value.clone())
            }
        }
    }

    fn validate(&self) -> Result<(), DialectTableError> {
        self.statements().validate()?;
        if let DialectStatements::Postgres { current_value, .. } = self {
            if current_value.trim().is_empty() {
                return Err(DialectTableError::ConfigError(
                    "current_value statement is empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Per-table configuration: key arity plus the statements for the chosen dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    data_size: usize,
    statements: DialectStatements,
}

impl TableConfig {
    /// Build and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns `DialectTableError::ConfigError` when `data_size` is zero or any statement is
    /// blank.
    pub fn new(data_size: usize, statements: DialectStatements) -> Result<Self, DialectTableError> {
        if data_size == 0 {
            return Err(DialectTableError::ConfigError(
                "data_size must be at least 1".to_string(),
            ));
        }
        statements.validate()?;
        Ok(Self {
            data_size,
            statements,
        })
    }

    /// Build a configuration from a dialect tag such as `"SQLite3"` or `"PG"`.
    ///
    /// `statements_for` is asked for the statements of the parsed dialect.
    ///
    /// # Errors
    ///
    /// Returns `DialectTableError::UnsupportedDialect` for unknown tags, and the errors of
    /// [`TableConfig::new`] otherwise.
    pub fn for_tag<F>(
        tag: &str,
        data_size: usize,
        statements_for: F,
    ) -> Result<Self, DialectTableError>
    where
        F: FnOnce(Dialect) -> DialectStatements,
    {
        let dialect: Dialect = tag.parse()?;
        let statements = statements_for(dialect);
        if statements.dialect() != dialect {
            return Err(DialectTableError::ConfigError(format!(
                "statements for {} supplied for dialect {dialect}",
                statements.dialect()
            )));
        }
        Self::new(data_size, statements)
    }

    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.statements.dialect()
    }

    #[must_use]
    pub fn statements(&self) -> &Statements {
        self.statements.statements()
    }

    #[must_use]
    pub fn dialect_statements(&self) -> &DialectStatements {
        &self.statements
    }

    #[must_use]
    pub fn id_recovery(&self) -> IdRecovery {
        self.statements.id_recovery()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_statements() -> Statements {
        Statements {
            select_by_key: "SELECT id FROM t WHERE v = ?1".into(),
            insert: "INSERT INTO t (v) VALUES (?1)".into(),
            select_by_id: "SELECT v FROM t WHERE id = ?1".into(),
            update: "UPDATE t SET v = ?1 WHERE id = ?2".into(),
            delete: "DELETE FROM t WHERE id = ?1".into(),
            create_schema: vec![
                "CREATE TABLE IF NOT EXISTS t (id INTEGER PRIMARY KEY, v TEXT)".into(),
            ],
            drop_schema: vec!["DROP TABLE IF EXISTS t".into()],
        }
    }

    #[test]
    fn dialect_follows_the_statement_variant() {
        let cfg = TableConfig::new(1, DialectStatements::Sqlite(sqlite_statements())).unwrap();
        assert_eq!(cfg.dialect(), Dialect::Sqlite);
        assert_eq!(cfg.id_recovery(), IdRecovery::LastInsertRowId);

        let cfg = TableConfig::new(
            1,
            DialectStatements::Postgres {
                statements: sqlite_statements(),
                current_value: "SELECT CURRVAL('t_seq')".into(),
            },
        )
        .unwrap();
        assert_eq!(cfg.dialect(), Dialect::Postgres);
        assert_eq!(
            cfg.id_recovery(),
            IdRecovery::SequenceCurrentValue("SELECT CURRVAL('t_seq')".into())
        );
    }

    #[test]
    fn zero_data_size_is_a_config_error() {
        let err =
            TableConfig::new(0, DialectStatements::Sqlite(sqlite_statements())).unwrap_err();
        assert!(matches!(err, DialectTableError::ConfigError(_)));
    }

    #[test]
    fn blank_statements_are_config_errors() {
        let mut statements = sqlite_statements();
        statements.update = "   ".into();
        let err = TableConfig::new(1, DialectStatements::Sqlite(statements)).unwrap_err();
        assert!(
            matches!(err, DialectTableError::ConfigError(ref msg) if msg.contains("update"))
        );

        let mut statements = sqlite_statements();
        statements.drop_schema.push(String::new());
        let err = TableConfig::new(1, DialectStatements::Sqlite(statements)).unwrap_err();
        assert!(
            matches!(err, DialectTableError::ConfigError(ref msg) if msg.contains("drop_schema"))
        );

        let err = TableConfig::new(
            1,
            DialectStatements::Postgres {
                statements: sqlite_statements(),
                current_value: String::new(),
            },
        )
        .unwrap_err();
        assert!(
            matches!(err, DialectTableError::ConfigError(ref msg) if msg.contains("current_value"))
        );
    }

    #[test]
    fn for_tag_rejects_unknown_and_mismatched_dialects() {
        let sqlite_only = |_: Dialect| DialectStatements::Sqlite(sqlite_statements());

        let err = TableConfig::for_tag("Oracle", 1, sqlite_only).unwrap_err();
        assert!(matches!(err, DialectTableError::UnsupportedDialect(_)));

        let err = TableConfig::for_tag("PG", 1, sqlite_only).unwrap_err();
        assert!(matches!(err, DialectTableError::ConfigError(_)));

        let cfg = TableConfig::for_tag("SQLite3", 1, sqlite_only).unwrap();
        assert_eq!(cfg.data_size(), 1);
    }
}
