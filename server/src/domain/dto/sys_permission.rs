use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;

use super::Pagination;

/// `anon` and `auth` are optional so that `false` can be filtered on
#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysPermissionPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    /// API, Page or Button
    #[serde(rename = "type")]
    #[search("type:exact;column:type;table:sys_permissions")]
    pub kind: String,

    #[search("type:exact;column:anon;table:sys_permissions")]
    pub anon: Option<bool>,

    #[search("type:exact;column:auth;table:sys_permissions")]
    pub auth: Option<bool>,

    #[search("type:contains;column:name,description;table:sys_permissions")]
    pub keyword: String,

    #[serde(flatten)]
    pub order: PermissionOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default)]
pub struct PermissionOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_permissions")]
    pub permission_id_order: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::{SqlValue, build_condition};
    use crate::data::sql::Driver;

    #[test]
    fn test_false_flag_is_filtered() {
        let query: SysPermissionPageQuery =
            serde_json::from_str(r#"{"type": "API", "anon": false}"#).unwrap();
        let condition = build_condition(Driver::Mysql, &query);
        let sql: Vec<&str> = condition.wheres.iter().map(|w| w.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "`sys_permissions`.`type` = ?",
                "`sys_permissions`.`anon` = ?"
            ]
        );
        assert_eq!(condition.wheres[1].args, vec![SqlValue::Bool(false)]);
    }

    #[test]
    fn test_absent_flags_are_skipped() {
        let query: SysPermissionPageQuery = serde_json::from_str("{}").unwrap();
        assert!(build_condition(Driver::Mysql, &query).is_empty());
    }
}
