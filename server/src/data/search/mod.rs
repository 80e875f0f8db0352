//! Dynamic query conditions
//!
//! Filter structs annotate their fields with directives and derive
//! [`Search`]; [`resolve_search_query`] turns a populated filter into WHERE,
//! OR, ORDER and JOIN fragments, and [`SelectBuilder`] renders those into
//! executable statements.
//!
//! ```
//! use orderin_server::data::search::{Search, SelectBuilder, build_condition};
//! use orderin_server::data::sql::Driver;
//!
//! #[derive(Default, Search)]
//! struct RoleQuery {
//!     #[search("type:contains;column:name;table:sys_roles")]
//!     name: String,
//!     #[search("type:exact;column:status;table:sys_roles")]
//!     status: i32,
//! }
//!
//! let query = RoleQuery { name: "admin".to_string(), ..Default::default() };
//! let condition = build_condition(Driver::Mysql, &query);
//! let statement = SelectBuilder::new(Driver::Mysql, "sys_roles")
//!     .condition(condition)
//!     .count();
//! assert_eq!(
//!     statement.sql,
//!     "SELECT COUNT(*) FROM `sys_roles` WHERE `sys_roles`.`name` LIKE ?"
//! );
//! ```

mod condition;
mod directive;
mod resolver;
mod scopes;
mod statement;
mod validate;
mod value;

pub use condition::{Condition, Fragment, Join, JoinKind, QueryCondition, parenthesize_or};
pub use directive::{Directive, DirectiveError, Lookup, SKIP_DIRECTIVE};
pub use resolver::{build_condition, resolve_directive, resolve_search_query, resolve_strict};
pub use scopes::{Page, SortPreset, not_deleted, paginate};
pub use statement::{ListQuery, SelectBuilder, Statement};
pub use validate::{SearchError, SiteError, validate_search};
pub use value::{FieldView, Search, SearchField, SearchSite, SqlValue, is_zero_search};

/// Derive macro for [`Search`]; shares its name with the trait
pub use orderin_derive::Search;
