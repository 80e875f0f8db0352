//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Identifier quoting (backticks vs double quotes)
/// - Case-insensitive pattern matching (LIKE vs ILIKE)
/// - LIKE escape handling
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - MySQL/SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Quote a table or column identifier
    ///
    /// - MySQL/SQLite: `` `name` ``
    /// - PostgreSQL: `"name"`
    fn quote_ident(&self, ident: &str) -> String;

    /// Pattern match operator
    ///
    /// Only PostgreSQL distinguishes the case-insensitive form (`ILIKE`);
    /// the other dialects fall back to `LIKE` and their collation.
    fn like_operator(&self, _case_insensitive: bool) -> &'static str {
        "LIKE"
    }

    /// Suffix appended after a LIKE placeholder so backslash escapes apply
    ///
    /// - MySQL/PostgreSQL: empty (backslash is the default escape)
    /// - SQLite: ` ESCAPE '\'`
    fn like_escape(&self) -> &'static str {
        ""
    }

    /// Generate LIMIT/OFFSET clause
    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    /// Qualify a column with its table, quoting both parts
    ///
    /// An empty table yields the bare quoted column.
    fn column(&self, table: &str, column: &str) -> String {
        if table.is_empty() {
            self.quote_ident(column)
        } else {
            format!("{}.{}", self.quote_ident(table), self.quote_ident(column))
        }
    }
}
