//! Search directive parsing
//!
//! A directive is the `key:value;key:value` string attached to a filter
//! field, e.g. `type:contains;column:username,nickname;table:sys_users`.

use std::fmt;

use thiserror::Error;

/// Directive marking a field as excluded from resolution
pub const SKIP_DIRECTIVE: &str = "-";

/// Operator selected by a directive's `type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    Gt,
    Gte,
    Lt,
    Lte,
    Not,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    In,
    NotIn,
    IsNull,
    Order,
    Or,
    Left,
    Right,
    Inner,
}

impl Lookup {
    pub fn parse(s: &str) -> Option<Self> {
        let lookup = match s {
            "exact" => Self::Exact,
            "iexact" => Self::IExact,
            "contains" => Self::Contains,
            "icontains" => Self::IContains,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "not" => Self::Not,
            "startswith" => Self::StartsWith,
            "istartswith" => Self::IStartsWith,
            "endswith" => Self::EndsWith,
            "iendswith" => Self::IEndsWith,
            "in" => Self::In,
            "notin" => Self::NotIn,
            "isnull" => Self::IsNull,
            "order" => Self::Order,
            "or" => Self::Or,
            "left" => Self::Left,
            "right" => Self::Right,
            "inner" => Self::Inner,
            _ => return None,
        };
        Some(lookup)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Not => "not",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::IsNull => "isnull",
            Self::Order => "order",
            Self::Or => "or",
            Self::Left => "left",
            Self::Right => "right",
            Self::Inner => "inner",
        }
    }

    /// Case-insensitive variants (`i*`)
    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Self::IExact | Self::IContains | Self::IStartsWith | Self::IEndsWith
        )
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Inner)
    }

    /// Whether the directive needs a `column` key
    pub fn needs_column(&self) -> bool {
        !matches!(self, Self::Or | Self::Left | Self::Right | Self::Inner)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directive parsing and shape errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("directive is empty")]
    Empty,

    #[error("directive has no type")]
    MissingType,

    #[error("unknown directive type '{0}'")]
    UnknownType(String),

    #[error("'{0}' directive needs a column")]
    MissingColumn(Lookup),

    #[error("'{0}' directive needs a join table")]
    MissingJoin(Lookup),

    #[error("'{0}' directive needs a base table")]
    MissingTable(Lookup),

    #[error("invalid on clause '{0}', expected on:<join_column>:<base_column>")]
    InvalidOn(String),

    #[error("'{lookup}' directive cannot apply to a {found} value (expected {expected})")]
    ShapeMismatch {
        lookup: Lookup,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid order direction '{0}', expected asc or desc")]
    InvalidOrder(String),
}

/// Parsed search directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub lookup: Lookup,
    pub columns: Vec<String>,
    pub table: String,
    pub join: Option<String>,
    /// (join-table column, base-table column)
    pub on: Option<(String, String)>,
}

impl Directive {
    pub fn new(lookup: Lookup) -> Self {
        Self {
            lookup,
            columns: Vec::new(),
            table: String::new(),
            join: None,
            on: None,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    pub fn on(mut self, join_column: impl Into<String>, base_column: impl Into<String>) -> Self {
        self.on = Some((join_column.into(), base_column.into()));
        self
    }

    /// Parse a directive string
    ///
    /// Unknown keys are ignored. Returns an error only for problems that make
    /// the directive unusable: no type, an unknown type, or a malformed `on`.
    pub fn parse(tag: &str) -> Result<Self, DirectiveError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(DirectiveError::Empty);
        }

        let mut lookup = None;
        let mut directive = Self::new(Lookup::Exact);

        for part in tag.split(';') {
            let Some((key, value)) = part.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "type" => {
                    lookup = Some(
                        Lookup::parse(value)
                            .ok_or_else(|| DirectiveError::UnknownType(value.to_string()))?,
                    );
                }
                "column" => {
                    directive.columns = value
                        .split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "table" => directive.table = value.to_string(),
                "join" => directive.join = Some(value.to_string()),
                "on" => {
                    let (join_column, base_column) = value
                        .split_once(':')
                        .filter(|(a, b)| !a.is_empty() && !b.is_empty() && !b.contains(':'))
                        .ok_or_else(|| DirectiveError::InvalidOn(value.to_string()))?;
                    directive.on = Some((join_column.to_string(), base_column.to_string()));
                }
                _ => {}
            }
        }

        directive.lookup = lookup.ok_or(DirectiveError::MissingType)?;
        Ok(directive)
    }

    /// Check that the directive carries the metadata its lookup needs
    pub fn check_metadata(&self) -> Result<(), DirectiveError> {
        if self.lookup.needs_column() && self.columns.is_empty() {
            return Err(DirectiveError::MissingColumn(self.lookup));
        }
        if self.lookup.is_join() {
            if self.join.as_deref().is_none_or(str::is_empty) {
                return Err(DirectiveError::MissingJoin(self.lookup));
            }
            if self.table.is_empty() {
                return Err(DirectiveError::MissingTable(self.lookup));
            }
            if self.on.is_none() {
                return Err(DirectiveError::InvalidOn(String::new()));
            }
        }
        Ok(())
    }
}
