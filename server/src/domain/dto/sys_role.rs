use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;

use super::Pagination;

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysRolePageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:contains;column:name;table:sys_roles")]
    pub name: String,

    #[serde(flatten)]
    pub order: RoleOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default)]
pub struct RoleOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_roles")]
    pub role_id_order: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::build_condition;
    use crate::data::sql::Driver;

    #[test]
    fn test_name_and_order() {
        let query: SysRolePageQuery =
            serde_json::from_str(r#"{"name": "adm", "idOrder": "ASC"}"#).unwrap();
        let condition = build_condition(Driver::Postgres, &query);
        assert_eq!(condition.wheres[0].sql, "\"sys_roles\".\"name\" LIKE ?");
        assert_eq!(condition.orders, vec!["\"sys_roles\".\"id\" asc"]);
    }
}
