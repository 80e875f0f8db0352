//! Strict directive validation

use std::fmt;

use thiserror::Error;

use super::directive::{Directive, DirectiveError, Lookup, SKIP_DIRECTIVE};
use super::value::{FieldView, Search, SearchSite, SqlValue};

/// A directive problem found at a field path such as `OwnRole.role_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteError {
    pub path: String,
    pub error: DirectiveError,
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid search directives: {}", join_sites(.0))]
    Invalid(Vec<SiteError>),
}

impl SearchError {
    pub fn sites(&self) -> &[SiteError] {
        match self {
            Self::Invalid(sites) => sites,
        }
    }
}

fn join_sites(sites: &[SiteError]) -> String {
    sites
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check every directive reachable from `query`
///
/// Directives are parsed and checked for the metadata their type needs.
/// Non-zero values are also checked against the shape the type expects.
pub fn validate_search(query: &dyn Search) -> Result<(), SearchError> {
    let mut errors = Vec::new();
    collect_errors(query, query.search_name(), &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SearchError::Invalid(errors))
    }
}

fn collect_errors(query: &dyn Search, prefix: &str, errors: &mut Vec<SiteError>) {
    for site in query.search_fields() {
        match site {
            SearchSite::Skipped { .. } => {}
            SearchSite::Nested { field, value } => {
                collect_errors(value, &format!("{}.{}", prefix, field), errors);
            }
            SearchSite::Tagged { field, tag, value } => {
                let path = format!("{}.{}", prefix, field);
                if tag.trim() == SKIP_DIRECTIVE {
                    continue;
                }
                let directive = match Directive::parse(tag).and_then(|d| {
                    d.check_metadata()?;
                    Ok(d)
                }) {
                    Ok(directive) => directive,
                    Err(error) => {
                        errors.push(SiteError { path, error });
                        continue;
                    }
                };
                if value.is_zero() {
                    continue;
                }
                let view = value.view();
                if let Err(error) = check_shape(&directive, &view) {
                    errors.push(SiteError {
                        path: path.clone(),
                        error,
                    });
                    continue;
                }
                // Children of groups and joins carry their own directives
                match view {
                    FieldView::Struct(nested) => collect_errors(nested, &path, errors),
                    FieldView::StructList(children) => {
                        for (i, child) in children.into_iter().enumerate() {
                            collect_errors(child, &format!("{}[{}]", path, i), errors);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn check_shape(directive: &Directive, view: &FieldView<'_>) -> Result<(), DirectiveError> {
    let lookup = directive.lookup;
    let expected = match lookup {
        Lookup::In | Lookup::NotIn => "list",
        Lookup::Or => match view {
            FieldView::List(items) if items.is_empty() => return Ok(()),
            _ => "list of structs",
        },
        Lookup::Left | Lookup::Right | Lookup::Inner => "struct",
        Lookup::Contains
        | Lookup::IContains
        | Lookup::StartsWith
        | Lookup::IStartsWith
        | Lookup::EndsWith
        | Lookup::IEndsWith => match view {
            FieldView::Scalar(_) | FieldView::List(_) => return Ok(()),
            _ => "scalar or list",
        },
        _ => "scalar",
    };

    if view.shape() != expected {
        return Err(DirectiveError::ShapeMismatch {
            lookup,
            expected,
            found: view.shape(),
        });
    }

    if lookup == Lookup::Order {
        let direction = match view {
            FieldView::Scalar(SqlValue::Text(direction)) => direction.to_lowercase(),
            FieldView::Scalar(other) => other.to_pattern_text(),
            _ => String::new(),
        };
        if direction != "asc" && direction != "desc" {
            return Err(DirectiveError::InvalidOrder(direction));
        }
    }
    Ok(())
}
