//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote_ident(&self, ident: &str) -> String {
        // SQLite accepts MySQL-style backticks for compatibility
        format!("`{}`", ident.replace('`', "``"))
    }

    fn like_escape(&self) -> &'static str {
        // SQLite has no default LIKE escape character
        " ESCAPE '\\'"
    }
}
