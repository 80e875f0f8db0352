//! Condition accumulator
//!
//! Collects WHERE, OR, ORDER and JOIN fragments emitted while resolving a
//! search struct. Fragments use `?` placeholders; see `statement` for how
//! they are applied to a query.

use std::fmt;

use super::value::SqlValue;

/// SQL join kind produced by `left`, `right` and `inner` directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Inner => "INNER JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Receives fragments from the resolver
pub trait Condition {
    /// Add a predicate ANDed with the others
    fn add_where(&mut self, fragment: String, args: Vec<SqlValue>);

    /// Add a predicate ORed with the other OR predicates
    fn add_or(&mut self, fragment: String, args: Vec<SqlValue>);

    /// Add an ORDER BY term (`column direction`)
    fn add_order(&mut self, fragment: String);

    /// Record a join and return the accumulator scoped to it
    fn add_join(&mut self, kind: JoinKind, on: String) -> &mut dyn Condition;
}

/// SQL fragment with its bound arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Wrap a fragment in parentheses when it contains a top-level `OR`
pub fn parenthesize_or(sql: &str) -> String {
    if sql.contains(" OR ") {
        format!("({})", sql)
    } else {
        sql.to_string()
    }
}

/// Join recorded by a join directive
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    /// Full join clause, e.g. ``INNER JOIN `r` ON `r`.`user_id` = `u`.`id` ``
    pub on: String,
    /// Fragments scoped to the join; WHERE fragments extend the ON clause
    pub condition: QueryCondition,
}

/// Default condition accumulator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCondition {
    pub wheres: Vec<Fragment>,
    pub ors: Vec<Fragment>,
    pub orders: Vec<String>,
    pub joins: Vec<Join>,
}

impl QueryCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.wheres.is_empty()
            && self.ors.is_empty()
            && self.orders.is_empty()
            && self.joins.is_empty()
    }
}

impl Condition for QueryCondition {
    fn add_where(&mut self, fragment: String, args: Vec<SqlValue>) {
        tracing::trace!(fragment = %fragment, args = args.len(), "where");
        self.wheres.push(Fragment::new(fragment, args));
    }

    fn add_or(&mut self, fragment: String, args: Vec<SqlValue>) {
        tracing::trace!(fragment = %fragment, args = args.len(), "or");
        self.ors.push(Fragment::new(fragment, args));
    }

    fn add_order(&mut self, fragment: String) {
        tracing::trace!(fragment = %fragment, "order");
        self.orders.push(fragment);
    }

    fn add_join(&mut self, kind: JoinKind, on: String) -> &mut dyn Condition {
        tracing::trace!(kind = %kind, on = %on, "join");
        self.joins.push(Join {
            kind,
            on,
            condition: QueryCondition::default(),
        });
        let last = self.joins.len() - 1;
        &mut self.joins[last].condition
    }
}
