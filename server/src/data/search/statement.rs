//! Statement rendering
//!
//! Turns a resolved [`QueryCondition`] into a SELECT (and matching COUNT)
//! for one base table:
//!
//! - JOINs in emission order, each ON clause extended with the WHERE
//!   fragments scoped to that join
//! - WHERE fragments ANDed, OR fragments grouped and ANDed to the rest
//! - ORDER terms in emission order, parent before join children
//! - `?` placeholders rewritten for the dialect, with list arguments
//!   expanded to one placeholder per element

use serde::Serialize;

use crate::data::sql::{Driver, SqlDialect};

use super::condition::{Fragment, QueryCondition, parenthesize_or};
use super::scopes::{Page, SortPreset, not_deleted};
use super::value::SqlValue;

/// Rendered SQL with positional arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

/// Page query and its total-count query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub select: Statement,
    pub count: Statement,
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    driver: Driver,
    table: String,
    condition: QueryCondition,
    filters: Vec<Fragment>,
    page: Option<Page>,
    fallback: Option<SortPreset>,
}

impl SelectBuilder {
    pub fn new(driver: Driver, table: impl Into<String>) -> Self {
        Self {
            driver,
            table: table.into(),
            condition: QueryCondition::new(),
            filters: Vec::new(),
            page: None,
            fallback: None,
        }
    }

    pub fn condition(mut self, condition: QueryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Add a hand-written WHERE fragment, ANDed after the resolved ones
    pub fn filter(mut self, fragment: Fragment) -> Self {
        self.filters.push(fragment);
        self
    }

    /// Exclude soft-deleted rows
    pub fn not_deleted(self) -> Self {
        let fragment = not_deleted(self.driver, &self.table);
        self.filter(fragment)
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Order used when the condition carries no ORDER terms
    pub fn fallback_order(mut self, preset: SortPreset) -> Self {
        self.fallback = Some(preset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// `SELECT <table>.* ...` with ORDER BY and LIMIT/OFFSET
    pub fn build(&self) -> Statement {
        let dialect = self.driver.dialect();
        let table = dialect.quote_ident(&self.table);
        let mut sql = format!("SELECT {}.* FROM {}", table, table);
        let mut args = Vec::new();
        self.push_body(&mut sql, &mut args);

        let mut orders = Vec::new();
        collect_orders(&self.condition, &mut orders);
        if orders.is_empty()
            && let Some(preset) = self.fallback
        {
            orders = preset.orders(self.driver, &self.table);
        }
        if !orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }
        if let Some(page) = self.page {
            sql.push(' ');
            sql.push_str(&dialect.limit_offset(page.limit, page.offset));
        }

        bind_placeholders(dialect, &sql, args)
    }

    /// `SELECT COUNT(*) ...` over the same joins and predicates
    pub fn count(&self) -> Statement {
        let dialect = self.driver.dialect();
        let mut sql = format!("SELECT COUNT(*) FROM {}", dialect.quote_ident(&self.table));
        let mut args = Vec::new();
        self.push_body(&mut sql, &mut args);
        bind_placeholders(dialect, &sql, args)
    }

    pub fn list(&self) -> ListQuery {
        ListQuery {
            select: self.build(),
            count: self.count(),
        }
    }

    /// JOIN and WHERE clauses; arguments follow their text order
    fn push_body(&self, sql: &mut String, args: &mut Vec<SqlValue>) {
        push_joins(&self.condition, sql, args);

        let mut predicates = Vec::new();
        for fragment in &self.condition.wheres {
            predicates.push(parenthesize_or(&fragment.sql));
            args.extend(fragment.args.iter().cloned());
        }
        if let Some(group) = or_group(&self.condition.ors, args) {
            predicates.push(group);
        }
        for fragment in &self.filters {
            predicates.push(parenthesize_or(&fragment.sql));
            args.extend(fragment.args.iter().cloned());
        }

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
    }
}

fn or_group(ors: &[Fragment], args: &mut Vec<SqlValue>) -> Option<String> {
    if ors.is_empty() {
        return None;
    }
    let parts: Vec<String> = ors
        .iter()
        .map(|fragment| {
            args.extend(fragment.args.iter().cloned());
            parenthesize_or(&fragment.sql)
        })
        .collect();
    Some(format!("({})", parts.join(" OR ")))
}

fn push_joins(condition: &QueryCondition, sql: &mut String, args: &mut Vec<SqlValue>) {
    for join in &condition.joins {
        sql.push(' ');
        sql.push_str(&join.on);
        for fragment in &join.condition.wheres {
            sql.push_str(" AND ");
            sql.push_str(&parenthesize_or(&fragment.sql));
            args.extend(fragment.args.iter().cloned());
        }
        if let Some(group) = or_group(&join.condition.ors, args) {
            sql.push_str(" AND ");
            sql.push_str(&group);
        }
        push_joins(&join.condition, sql, args);
    }
}

fn collect_orders(condition: &QueryCondition, orders: &mut Vec<String>) {
    orders.extend(condition.orders.iter().cloned());
    for join in &condition.joins {
        collect_orders(&join.condition, orders);
    }
}

/// Rewrite `?` placeholders outside quotes, flattening list arguments
fn bind_placeholders(dialect: &dyn SqlDialect, sql: &str, args: Vec<SqlValue>) -> Statement {
    let mut out = String::with_capacity(sql.len() + args.len() * 2);
    let mut bound = Vec::with_capacity(args.len());
    let mut pending = args.into_iter();
    let mut quote: Option<char> = None;

    for ch in sql.chars() {
        match (quote, ch) {
            (Some(open), c) if c == open => {
                quote = None;
                out.push(c);
            }
            (Some(_), c) => out.push(c),
            (None, '\'' | '"' | '`') => {
                quote = Some(ch);
                out.push(ch);
            }
            (None, '?') => match pending.next() {
                Some(SqlValue::List(items)) if items.is_empty() => out.push_str("NULL"),
                Some(SqlValue::List(items)) => {
                    let placeholders: Vec<String> = items
                        .into_iter()
                        .map(|item| {
                            bound.push(item);
                            dialect.placeholder(bound.len())
                        })
                        .collect();
                    out.push_str(&placeholders.join(", "));
                }
                Some(value) => {
                    bound.push(value);
                    out.push_str(&dialect.placeholder(bound.len()));
                }
                None => out.push('?'),
            },
            (None, c) => out.push(c),
        }
    }

    Statement {
        sql: out,
        args: bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::{Condition, JoinKind, paginate};

    fn sample_condition() -> QueryCondition {
        let mut condition = QueryCondition::new();
        condition.add_where(
            "`u`.`name` LIKE ? OR `u`.`phone` LIKE ?".to_string(),
            vec![SqlValue::from("%a%"), SqlValue::from("%a%")],
        );
        condition.add_where(
            "`u`.`id` IN (?)".to_string(),
            vec![SqlValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)])],
        );
        condition.add_order("`u`.`id` desc".to_string());
        let child = condition.add_join(
            JoinKind::Inner,
            "INNER JOIN `r` ON `r`.`user_id` = `u`.`id`".to_string(),
        );
        child.add_where("`r`.`role_id` = ?".to_string(), vec![SqlValue::Int(5)]);
        child.add_order("`r`.`id` asc".to_string());
        condition
    }

    #[test]
    fn test_build_select_mysql() {
        let statement = SelectBuilder::new(Driver::Mysql, "u")
            .condition(sample_condition())
            .page(paginate(10, 2))
            .build();

        assert_eq!(
            statement.sql,
            "SELECT `u`.* FROM `u` INNER JOIN `r` ON `r`.`user_id` = `u`.`id` AND `r`.`role_id` = ? \
             WHERE (`u`.`name` LIKE ? OR `u`.`phone` LIKE ?) AND `u`.`id` IN (?, ?) \
             ORDER BY `u`.`id` desc, `r`.`id` asc LIMIT 10 OFFSET 10"
        );
        assert_eq!(
            statement.args,
            vec![
                SqlValue::Int(5),
                SqlValue::from("%a%"),
                SqlValue::from("%a%"),
                SqlValue::Int(1),
                SqlValue::Int(2),
            ]
        );
    }

    #[test]
    fn test_build_count_postgres_numbers_placeholders() {
        let mut condition = QueryCondition::new();
        condition.add_where(
            "\"u\".\"id\" IN (?)".to_string(),
            vec![SqlValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)])],
        );
        condition.add_where("\"u\".\"status\" = ?".to_string(), vec![SqlValue::Int(1)]);

        let statement = SelectBuilder::new(Driver::Postgres, "u")
            .condition(condition)
            .count();
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) FROM \"u\" WHERE \"u\".\"id\" IN ($1, $2) AND \"u\".\"status\" = $3"
        );
        assert_eq!(statement.args.len(), 3);
    }

    #[test]
    fn test_or_fragments_grouped() {
        let mut condition = QueryCondition::new();
        condition.add_where("`t`.`a` = ?".to_string(), vec![SqlValue::Int(1)]);
        condition.add_or("`t`.`b` = ?".to_string(), vec![SqlValue::Int(2)]);
        condition.add_or("`t`.`c` = ?".to_string(), vec![SqlValue::Int(3)]);

        let statement = SelectBuilder::new(Driver::Mysql, "t")
            .condition(condition)
            .count();
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) FROM `t` WHERE `t`.`a` = ? AND (`t`.`b` = ? OR `t`.`c` = ?)"
        );
        assert_eq!(
            statement.args,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_fallback_order_and_scopes() {
        let statement = SelectBuilder::new(Driver::Mysql, "sys_dicts")
            .not_deleted()
            .fallback_order(SortPreset::UpdatedDesc)
            .build();
        assert_eq!(
            statement.sql,
            "SELECT `sys_dicts`.* FROM `sys_dicts` WHERE `sys_dicts`.`deleted` = 0 \
             ORDER BY `sys_dicts`.`updated_at` desc"
        );

        let mut condition = QueryCondition::new();
        condition.add_order("`sys_dicts`.`id` asc".to_string());
        let statement = SelectBuilder::new(Driver::Mysql, "sys_dicts")
            .condition(condition)
            .fallback_order(SortPreset::UpdatedDesc)
            .build();
        assert!(statement.sql.ends_with("ORDER BY `sys_dicts`.`id` asc"));
    }

    #[test]
    fn test_empty_condition() {
        let query = SelectBuilder::new(Driver::Sqlite, "t").list();
        assert_eq!(query.select.sql, "SELECT `t`.* FROM `t`");
        assert_eq!(query.count.sql, "SELECT COUNT(*) FROM `t`");
        assert!(query.select.args.is_empty());
    }

    #[test]
    fn test_placeholders_inside_quotes_are_kept() {
        let statement = bind_placeholders(
            Driver::Postgres.dialect(),
            "\"a?\" = ? AND b LIKE ? ESCAPE '?'",
            vec![SqlValue::Int(1), SqlValue::from("x")],
        );
        assert_eq!(statement.sql, "\"a?\" = $1 AND b LIKE $2 ESCAPE '?'");
    }

    #[test]
    fn test_sqlite_escape_clause_survives() {
        let mut condition = QueryCondition::new();
        condition.add_where(
            r"`t`.`a` LIKE ? ESCAPE '\'".to_string(),
            vec![SqlValue::from("%x%")],
        );
        let statement = SelectBuilder::new(Driver::Sqlite, "t")
            .condition(condition)
            .count();
        assert_eq!(
            statement.sql,
            r"SELECT COUNT(*) FROM `t` WHERE `t`.`a` LIKE ? ESCAPE '\'"
        );
        assert_eq!(statement.args, vec![SqlValue::from("%x%")]);
    }
}
