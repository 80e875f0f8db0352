//! Search query resolver
//!
//! Walks a [`Search`] struct field by field and emits fragments into a
//! [`Condition`]. Resolution is permissive: a directive that cannot be
//! applied (unknown type, wrong field shape, missing column) contributes
//! nothing and is logged at debug level. Use [`resolve_strict`] to reject
//! malformed directives instead.

use crate::data::sql::{Driver, SqlDialect};
use crate::utils::sql::{LikeAnchor, like_pattern};

use super::condition::{Condition, JoinKind, QueryCondition, parenthesize_or};
use super::directive::{Directive, Lookup};
use super::validate::{SearchError, validate_search};
use super::value::{FieldView, Search, SearchField, SearchSite, SqlValue};

/// Resolve every field of `query` into `condition`, in declaration order
pub fn resolve_search_query(driver: Driver, query: &dyn Search, condition: &mut dyn Condition) {
    for site in query.search_fields() {
        match site {
            SearchSite::Nested { value, .. } => resolve_search_query(driver, value, condition),
            SearchSite::Skipped { .. } => {}
            SearchSite::Tagged { field, tag, value } => match Directive::parse(tag) {
                Ok(directive) => resolve_directive(driver, &directive, value, condition),
                Err(e) => {
                    tracing::debug!(
                        owner = query.search_name(),
                        field,
                        error = %e,
                        "Skipping unparseable search directive"
                    );
                }
            },
        }
    }
}

/// Validate every directive of `query`, then resolve it
pub fn resolve_strict(
    driver: Driver,
    query: &dyn Search,
    condition: &mut dyn Condition,
) -> Result<(), SearchError> {
    validate_search(query)?;
    resolve_search_query(driver, query, condition);
    Ok(())
}

/// Resolve `query` into a fresh [`QueryCondition`]
pub fn build_condition(driver: Driver, query: &dyn Search) -> QueryCondition {
    let mut condition = QueryCondition::new();
    resolve_search_query(driver, query, &mut condition);
    condition
}

/// Apply a single directive to a field value
///
/// Zero values are skipped. This is also the entry point for filters
/// declared in code rather than through `#[derive(Search)]`.
pub fn resolve_directive(
    driver: Driver,
    directive: &Directive,
    value: &dyn SearchField,
    condition: &mut dyn Condition,
) {
    if value.is_zero() {
        return;
    }

    let lookup = directive.lookup;
    let view = value.view();

    if lookup == Lookup::Or {
        resolve_or(driver, view, condition);
        return;
    }
    if let Some(kind) = join_kind(lookup) {
        resolve_join(driver, directive, kind, view, condition);
        return;
    }
    if directive.columns.is_empty() {
        tracing::debug!(lookup = %lookup, "Skipping search directive without column");
        return;
    }

    let dialect = driver.dialect();
    let emitted = match lookup {
        Lookup::IExact
            if driver == Driver::Postgres
                && matches!(view, FieldView::Scalar(SqlValue::Text(_))) =>
        {
            like_predicate(dialect, directive, view, true, LikeAnchor::Whole)
        }
        Lookup::Exact | Lookup::IExact => compare_predicate(dialect, directive, view, "="),
        Lookup::Gt => compare_predicate(dialect, directive, view, ">"),
        Lookup::Gte => compare_predicate(dialect, directive, view, ">="),
        Lookup::Lt => compare_predicate(dialect, directive, view, "<"),
        Lookup::Lte => compare_predicate(dialect, directive, view, "<="),
        Lookup::Not => compare_predicate(dialect, directive, view, "!="),
        Lookup::Contains | Lookup::IContains => like_predicate(
            dialect,
            directive,
            view,
            lookup.is_case_insensitive(),
            LikeAnchor::Contains,
        ),
        Lookup::StartsWith | Lookup::IStartsWith => like_predicate(
            dialect,
            directive,
            view,
            lookup.is_case_insensitive(),
            LikeAnchor::Prefix,
        ),
        Lookup::EndsWith | Lookup::IEndsWith => like_predicate(
            dialect,
            directive,
            view,
            lookup.is_case_insensitive(),
            LikeAnchor::Suffix,
        ),
        Lookup::In => list_predicate(dialect, directive, view, "IN"),
        Lookup::NotIn => list_predicate(dialect, directive, view, "NOT IN"),
        Lookup::IsNull => Some(across_columns(dialect, directive, |column| {
            (format!("{} IS NULL", column), Vec::new())
        })),
        Lookup::Order => {
            resolve_order(dialect, directive, view, condition);
            None
        }
        Lookup::Or | Lookup::Left | Lookup::Right | Lookup::Inner => None,
    };

    if let Some((fragment, args)) = emitted {
        condition.add_where(fragment, args);
    }
}

fn join_kind(lookup: Lookup) -> Option<JoinKind> {
    match lookup {
        Lookup::Left => Some(JoinKind::Left),
        Lookup::Right => Some(JoinKind::Right),
        Lookup::Inner => Some(JoinKind::Inner),
        _ => None,
    }
}

/// Build one predicate per column and OR them together
fn across_columns<F>(
    dialect: &dyn SqlDialect,
    directive: &Directive,
    mut predicate: F,
) -> (String, Vec<SqlValue>)
where
    F: FnMut(&str) -> (String, Vec<SqlValue>),
{
    let mut clauses = Vec::with_capacity(directive.columns.len());
    let mut args = Vec::new();
    for column in &directive.columns {
        let (clause, column_args) = predicate(&dialect.column(&directive.table, column));
        clauses.push(clause);
        args.extend(column_args);
    }
    (clauses.join(" OR "), args)
}

fn compare_predicate(
    dialect: &dyn SqlDialect,
    directive: &Directive,
    view: FieldView<'_>,
    op: &str,
) -> Option<(String, Vec<SqlValue>)> {
    let FieldView::Scalar(value) = view else {
        tracing::debug!(
            lookup = %directive.lookup,
            shape = view.shape(),
            "Comparison needs a scalar"
        );
        return None;
    };
    Some(across_columns(dialect, directive, |column| {
        (format!("{} {} ?", column, op), vec![value.clone()])
    }))
}

/// LIKE predicates: one per value and column, ORed
///
/// A list field produces one pattern per element.
fn like_predicate(
    dialect: &dyn SqlDialect,
    directive: &Directive,
    view: FieldView<'_>,
    case_insensitive: bool,
    anchor: LikeAnchor,
) -> Option<(String, Vec<SqlValue>)> {
    let values = match view {
        FieldView::Scalar(value) => vec![value],
        FieldView::List(values) if !values.is_empty() => values,
        other => {
            tracing::debug!(
                lookup = %directive.lookup,
                shape = other.shape(),
                "Pattern match needs a scalar or list"
            );
            return None;
        }
    };

    let op = dialect.like_operator(case_insensitive);
    let escape = dialect.like_escape();
    let mut clauses = Vec::new();
    let mut args = Vec::new();
    for value in &values {
        let (clause, column_args) = across_columns(dialect, directive, |column| {
            let bound = like_pattern(&value.to_pattern_text(), anchor);
            (
                format!("{} {} ?{}", column, op, escape),
                vec![SqlValue::Text(bound)],
            )
        });
        clauses.push(clause);
        args.extend(column_args);
    }
    Some((clauses.join(" OR "), args))
}

fn list_predicate(
    dialect: &dyn SqlDialect,
    directive: &Directive,
    view: FieldView<'_>,
    op: &str,
) -> Option<(String, Vec<SqlValue>)> {
    let FieldView::List(values) = view else {
        tracing::debug!(lookup = %directive.lookup, shape = view.shape(), "IN needs a list");
        return None;
    };
    if values.is_empty() {
        return None;
    }
    Some(across_columns(dialect, directive, |column| {
        (
            format!("{} {} (?)", column, op),
            vec![SqlValue::List(values.clone())],
        )
    }))
}

fn resolve_order(
    dialect: &dyn SqlDialect,
    directive: &Directive,
    view: FieldView<'_>,
    condition: &mut dyn Condition,
) {
    let FieldView::Scalar(SqlValue::Text(direction)) = view else {
        return;
    };
    let direction = direction.to_lowercase();
    if direction != "asc" && direction != "desc" {
        tracing::debug!(direction = %direction, "Ignoring unknown order direction");
        return;
    }
    for column in &directive.columns {
        condition.add_order(format!(
            "{} {}",
            dialect.column(&directive.table, column),
            direction
        ));
    }
}

/// Resolve each element into its own scope and OR the scopes together
fn resolve_or(driver: Driver, view: FieldView<'_>, condition: &mut dyn Condition) {
    let children = match view {
        FieldView::StructList(children) => children,
        FieldView::List(items) if items.is_empty() => return,
        other => {
            tracing::debug!(shape = other.shape(), "or directive needs a list of structs");
            return;
        }
    };

    let mut groups = Vec::with_capacity(children.len());
    let mut args = Vec::new();
    for child in children {
        let scoped = build_condition(driver, child);
        if scoped.wheres.is_empty() {
            continue;
        }
        let clause = scoped
            .wheres
            .iter()
            .map(|w| parenthesize_or(&w.sql))
            .collect::<Vec<_>>()
            .join(" AND ");
        groups.push(format!("({})", clause));
        args.extend(scoped.wheres.into_iter().flat_map(|w| w.args));
    }

    if !groups.is_empty() {
        condition.add_where(groups.join(" OR "), args);
    }
}

fn resolve_join(
    driver: Driver,
    directive: &Directive,
    kind: JoinKind,
    view: FieldView<'_>,
    condition: &mut dyn Condition,
) {
    let FieldView::Struct(nested) = view else {
        tracing::debug!(shape = view.shape(), "join directive needs a struct");
        return;
    };
    let (Some(join), Some((join_column, base_column))) =
        (directive.join.as_deref(), directive.on.as_ref())
    else {
        tracing::debug!(kind = %kind, "Skipping join directive without join/on");
        return;
    };

    let dialect = driver.dialect();
    let on = format!(
        "{} {} ON {} = {}",
        kind.keyword(),
        dialect.quote_ident(join),
        dialect.column(join, join_column),
        dialect.column(&directive.table, base_column),
    );
    let scoped = condition.add_join(kind, on);
    resolve_search_query(driver, nested, scoped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::{Fragment, Search};

    #[derive(Default, Search)]
    struct Keyword {
        #[search("type:contains;column:a,b;table:t")]
        keyword: String,
    }

    #[derive(Default, Search)]
    struct Ids {
        #[search("type:in;column:id;table:t")]
        ids: Vec<i64>,
        #[search("type:notin;column:id;table:t")]
        exclude: Vec<i64>,
    }

    #[derive(Default, Search)]
    struct IdOrder {
        #[search("type:order;column:id;table:t")]
        id_order: String,
    }

    #[derive(Default, Search)]
    struct NameFilter {
        #[search("type:exact;column:name;table:t")]
        name: String,
    }

    #[derive(Default, Search)]
    struct Embedded {
        name: NameFilter,
        order: IdOrder,
    }

    #[derive(Default, Search)]
    struct Comparisons {
        #[search("type:gt;column:age;table:t")]
        older_than: i32,
        #[search("type:lte;column:age;table:t")]
        at_most: i32,
        #[search("type:not;column:state;table:t")]
        not_state: String,
        #[search("type:isnull;column:deleted_at;table:t")]
        deleted_missing: bool,
        #[search("type:exact;column:status;table:t")]
        status: Option<i32>,
    }

    #[derive(Default, Search)]
    struct Patterns {
        #[search("type:icontains;column:name;table:t")]
        name: String,
        #[search("type:startswith;column:code;table:t")]
        code_prefix: String,
        #[search("type:iendswith;column:email;table:t")]
        email_suffix: String,
        #[search("type:contains;column:tag;table:t")]
        tags: Vec<String>,
    }

    #[derive(Default, Search)]
    struct Branch {
        #[search("type:exact;column:a;table:t")]
        a: i32,
        #[search("type:exact;column:b;table:t")]
        b: i32,
    }

    #[derive(Default, Search)]
    struct AnyBranch {
        #[search("type:or")]
        branches: Vec<Branch>,
    }

    #[derive(Default, Search)]
    struct RoleFilter {
        #[search("type:exact;column:role_id;table:r")]
        role_id: i64,
    }

    #[derive(Default, Search)]
    struct Joined {
        #[search("type:left;on:user_id:id;table:u;join:r")]
        left: RoleFilter,
        #[search("type:right;on:user_id:id;table:u;join:r")]
        right: RoleFilter,
    }

    #[derive(Default, Search)]
    struct Broken {
        #[search("type:between;column:a;table:t")]
        between: i32,
        #[search("type:exact;table:t")]
        no_column: i32,
        #[search("type:in;column:id;table:t")]
        not_a_list: i32,
        #[allow(dead_code)] // Skipped by the derive
        #[search("-")]
        page: i32,
        #[search("type:exact;column:ok;table:t")]
        ok: i32,
    }

    #[test]
    fn test_all_zero_fields_produce_nothing() {
        let condition = build_condition(Driver::Mysql, &Comparisons::default());
        assert!(condition.is_empty());

        let condition = build_condition(Driver::Mysql, &Embedded::default());
        assert!(condition.is_empty());

        let condition = build_condition(Driver::Mysql, &AnyBranch::default());
        assert!(condition.is_empty());
    }

    #[test]
    fn test_contains_across_columns() {
        let filter = Keyword {
            keyword: "x".to_string(),
        };
        let condition = build_condition(Driver::Mysql, &filter);

        assert_eq!(
            condition.wheres,
            vec![Fragment::new(
                "`t`.`a` LIKE ? OR `t`.`b` LIKE ?",
                vec![SqlValue::from("%x%"), SqlValue::from("%x%")]
            )]
        );
        assert!(condition.ors.is_empty());
    }

    #[test]
    fn test_contains_escapes_like_metacharacters() {
        let filter = Keyword {
            keyword: "100%_".to_string(),
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(condition.wheres[0].args[0], SqlValue::from("%100\\%\\_%"));
    }

    #[test]
    fn test_in_requires_non_empty_list() {
        let condition = build_condition(Driver::Mysql, &Ids::default());
        assert!(condition.is_empty());

        let filter = Ids {
            ids: vec![1, 2, 3],
            exclude: vec![9],
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(
            condition.wheres,
            vec![
                Fragment::new(
                    "`t`.`id` IN (?)",
                    vec![SqlValue::List(vec![
                        SqlValue::Int(1),
                        SqlValue::Int(2),
                        SqlValue::Int(3)
                    ])]
                ),
                Fragment::new(
                    "`t`.`id` NOT IN (?)",
                    vec![SqlValue::List(vec![SqlValue::Int(9)])]
                ),
            ]
        );
    }

    #[test]
    fn test_order_direction() {
        let condition = build_condition(
            Driver::Mysql,
            &IdOrder {
                id_order: "desc".to_string(),
            },
        );
        assert_eq!(condition.orders, vec!["`t`.`id` desc"]);
        assert!(condition.wheres.is_empty());

        let condition = build_condition(
            Driver::Mysql,
            &IdOrder {
                id_order: "ASC".to_string(),
            },
        );
        assert_eq!(condition.orders, vec!["`t`.`id` asc"]);

        let condition = build_condition(
            Driver::Mysql,
            &IdOrder {
                id_order: "sideways".to_string(),
            },
        );
        assert!(condition.is_empty());
    }

    #[test]
    fn test_nested_structs_merge_in_order() {
        let filter = Embedded {
            name: NameFilter {
                name: "bob".to_string(),
            },
            order: IdOrder {
                id_order: "asc".to_string(),
            },
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(
            condition.wheres,
            vec![Fragment::new("`t`.`name` = ?", vec![SqlValue::from("bob")])]
        );
        assert_eq!(condition.orders, vec!["`t`.`id` asc"]);
    }

    #[test]
    fn test_comparisons_and_option_zero() {
        let filter = Comparisons {
            older_than: 18,
            at_most: 65,
            not_state: "closed".to_string(),
            deleted_missing: true,
            status: Some(0),
        };
        let condition = build_condition(Driver::Mysql, &filter);
        let sql: Vec<&str> = condition.wheres.iter().map(|w| w.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "`t`.`age` > ?",
                "`t`.`age` <= ?",
                "`t`.`state` != ?",
                "`t`.`deleted_at` IS NULL",
                "`t`.`status` = ?",
            ]
        );
        assert!(condition.wheres[3].args.is_empty());
        assert_eq!(condition.wheres[4].args, vec![SqlValue::Int(0)]);
    }

    #[test]
    fn test_patterns_mysql() {
        let filter = Patterns {
            name: "Ann".to_string(),
            code_prefix: "A1".to_string(),
            email_suffix: "@x.io".to_string(),
            tags: vec!["red".to_string(), "blue".to_string()],
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(condition.wheres[0].sql, "`t`.`name` LIKE ?");
        assert_eq!(condition.wheres[1].args, vec![SqlValue::from("A1%")]);
        assert_eq!(condition.wheres[2].args, vec![SqlValue::from("%@x.io")]);
        assert_eq!(condition.wheres[3].sql, "`t`.`tag` LIKE ? OR `t`.`tag` LIKE ?");
        assert_eq!(
            condition.wheres[3].args,
            vec![SqlValue::from("%red%"), SqlValue::from("%blue%")]
        );
    }

    #[test]
    fn test_patterns_postgres_use_ilike_for_case_insensitive() {
        let filter = Patterns {
            name: "Ann".to_string(),
            code_prefix: "A1".to_string(),
            email_suffix: "@x.io".to_string(),
            tags: Vec::new(),
        };
        let condition = build_condition(Driver::Postgres, &filter);
        assert_eq!(condition.wheres[0].sql, "\"t\".\"name\" ILIKE ?");
        assert_eq!(condition.wheres[1].sql, "\"t\".\"code\" LIKE ?");
        assert_eq!(condition.wheres[2].sql, "\"t\".\"email\" ILIKE ?");
    }

    #[test]
    fn test_patterns_sqlite_add_escape_clause() {
        let filter = Keyword {
            keyword: "x".to_string(),
        };
        let condition = build_condition(Driver::Sqlite, &filter);
        assert_eq!(
            condition.wheres[0].sql,
            r"`t`.`a` LIKE ? ESCAPE '\' OR `t`.`b` LIKE ? ESCAPE '\'"
        );
    }

    #[test]
    fn test_or_groups_children() {
        let filter = AnyBranch {
            branches: vec![
                Branch { a: 1, b: 2 },
                Branch::default(),
                Branch { a: 3, b: 0 },
            ],
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(
            condition.wheres,
            vec![Fragment::new(
                "(`t`.`a` = ? AND `t`.`b` = ?) OR (`t`.`a` = ?)",
                vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
            )]
        );
    }

    #[test]
    fn test_joins_scope_nested_fragments() {
        let filter = Joined {
            left: RoleFilter { role_id: 5 },
            right: RoleFilter::default(),
        };
        let condition = build_condition(Driver::Mysql, &filter);

        assert!(condition.wheres.is_empty());
        assert_eq!(condition.joins.len(), 1);
        let join = &condition.joins[0];
        assert_eq!(join.kind, JoinKind::Left);
        assert_eq!(join.on, "LEFT JOIN `r` ON `r`.`user_id` = `u`.`id`");
        assert_eq!(
            join.condition.wheres,
            vec![Fragment::new("`r`.`role_id` = ?", vec![SqlValue::Int(5)])]
        );

        let filter = Joined {
            left: RoleFilter::default(),
            right: RoleFilter { role_id: 7 },
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(
            condition.joins[0].on,
            "RIGHT JOIN `r` ON `r`.`user_id` = `u`.`id`"
        );
    }

    #[test]
    fn test_malformed_directives_are_skipped() {
        let filter = Broken {
            between: 1,
            no_column: 2,
            not_a_list: 3,
            page: 4,
            ok: 5,
        };
        let condition = build_condition(Driver::Mysql, &filter);
        assert_eq!(
            condition.wheres,
            vec![Fragment::new("`t`.`ok` = ?", vec![SqlValue::Int(5)])]
        );
    }

    #[test]
    fn test_strict_rejects_malformed_directives() {
        let filter = Broken {
            between: 1,
            no_column: 2,
            not_a_list: 3,
            page: 4,
            ok: 5,
        };
        let mut condition = QueryCondition::new();
        let err = resolve_strict(Driver::Mysql, &filter, &mut condition).unwrap_err();
        assert_eq!(err.sites().len(), 3);
        assert!(condition.is_empty());
    }

    #[test]
    fn test_postgres_iexact_is_case_insensitive() {
        let directive = Directive::new(Lookup::IExact).table("t").column("name");
        let mut condition = QueryCondition::new();
        resolve_directive(
            Driver::Postgres,
            &directive,
            &"Ann_1".to_string(),
            &mut condition,
        );
        assert_eq!(
            condition.wheres,
            vec![Fragment::new(
                "\"t\".\"name\" ILIKE ?",
                vec![SqlValue::from("Ann\\_1")]
            )]
        );

        let mut condition = QueryCondition::new();
        resolve_directive(Driver::Mysql, &directive, &"Ann".to_string(), &mut condition);
        assert_eq!(condition.wheres[0].sql, "`t`.`name` = ?");
    }

    #[test]
    fn test_postgres_iexact_on_non_text_is_equality() {
        let directive = Directive::new(Lookup::IExact).table("t").column("id");
        let mut condition = QueryCondition::new();
        resolve_directive(Driver::Postgres, &directive, &5i64, &mut condition);
        assert_eq!(
            condition.wheres,
            vec![Fragment::new("\"t\".\"id\" = ?", vec![SqlValue::Int(5)])]
        );

        let mut condition = QueryCondition::new();
        resolve_directive(Driver::Postgres, &directive, &true, &mut condition);
        assert_eq!(condition.wheres[0].sql, "\"t\".\"id\" = ?");
        assert_eq!(condition.wheres[0].args, vec![SqlValue::Bool(true)]);
    }

    #[test]
    fn test_programmatic_directive_skips_zero() {
        let directive = Directive::new(Lookup::Gte).table("t").column("created_at");
        let mut condition = QueryCondition::new();
        resolve_directive(Driver::Mysql, &directive, &0i64, &mut condition);
        assert!(condition.is_empty());

        resolve_directive(Driver::Mysql, &directive, &10i64, &mut condition);
        assert_eq!(condition.wheres[0].sql, "`t`.`created_at` >= ?");
    }
}
