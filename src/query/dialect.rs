// SQL Dialects
//
// Identifier quoting and placeholder style of the target database.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    MySql,
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Identifier quote character
    pub fn quote(self) -> char {
        match self {
            Dialect::MySql | Dialect::Sqlite => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Write the placeholder for the argument at 1-based `position`
    pub fn write_placeholder(self, sql: &mut String, position: usize) {
        match self {
            Dialect::MySql | Dialect::Sqlite => sql.push('?'),
            Dialect::Postgres => {
                sql.push('$');
                sql.push_str(&position.to_string());
            }
        }
    }
}
