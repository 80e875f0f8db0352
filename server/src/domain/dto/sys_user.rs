use serde::Deserialize;
use validator::Validate;

use crate::data::search::{Fragment, Search, SqlValue};
use crate::data::sql::Driver;
use crate::domain::types::id_string;

use super::{PageQuery, Pagination};

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysUserPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:exact;column:username;table:sys_users")]
    pub username: String,

    #[search("type:contains;column:nickname;table:sys_users")]
    pub nickname: String,

    #[search("type:exact;column:real_name;table:sys_users")]
    pub real_name: String,

    #[search("type:exact;column:phone;table:sys_users")]
    pub phone: String,

    /// Matches any of username, nickname, real name or phone
    #[search("type:contains;column:username,nickname,real_name,phone;table:sys_users")]
    pub keyword: String,

    #[search("type:exact;column:status;table:sys_users")]
    pub status: i32,

    #[serde(flatten)]
    #[search("type:inner;on:user_id:id;table:sys_users;join:sys_role_users")]
    pub own_role: OwnRole,

    /// Users not bound to this role; applied as a NOT EXISTS subquery
    #[serde(with = "id_string")]
    #[search("-")]
    pub exclude_role_id: i64,

    #[serde(flatten)]
    pub order: UserOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct UserOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_users")]
    pub user_id_order: String,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnRole {
    #[serde(with = "id_string")]
    #[search("type:exact;column:role_id;table:sys_role_users")]
    pub role_id: i64,
}

impl SysUserPageQuery {
    fn exclude_role_filter(&self, driver: Driver) -> Option<Fragment> {
        if self.exclude_role_id <= 0 {
            return None;
        }
        let dialect = driver.dialect();
        let sql = format!(
            "NOT EXISTS (SELECT 1 FROM {} WHERE {} = {} AND {} = ?)",
            dialect.quote_ident("sys_role_users"),
            dialect.column("sys_users", "id"),
            dialect.column("sys_role_users", "user_id"),
            dialect.column("sys_role_users", "role_id"),
        );
        Some(Fragment::new(sql, vec![SqlValue::Int(self.exclude_role_id)]))
    }
}

impl PageQuery for SysUserPageQuery {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn extra_filters(&self, driver: Driver) -> Vec<Fragment> {
        self.exclude_role_filter(driver).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::{Fragment, JoinKind, build_condition};

    #[test]
    fn test_decode_camel_case_and_string_ids() {
        let query: SysUserPageQuery = serde_json::from_str(
            r#"{"pageIndex": 2, "pageSize": 20, "realName": "Ann", "roleId": "5",
                "excludeRoleId": "9", "idOrder": "desc"}"#,
        )
        .unwrap();
        assert_eq!(query.pagination.page_index, 2);
        assert_eq!(query.real_name, "Ann");
        assert_eq!(query.own_role.role_id, 5);
        assert_eq!(query.exclude_role_id, 9);
        assert_eq!(query.order.user_id_order, "desc");
    }

    #[test]
    fn test_keyword_and_role_scenario() {
        let query: SysUserPageQuery =
            serde_json::from_str(r#"{"keyword": "ann", "status": 0, "roleId": "5"}"#).unwrap();
        let condition = build_condition(Driver::Mysql, &query);

        assert_eq!(condition.wheres.len(), 1);
        assert_eq!(
            condition.wheres[0].sql,
            "`sys_users`.`username` LIKE ? OR `sys_users`.`nickname` LIKE ? \
             OR `sys_users`.`real_name` LIKE ? OR `sys_users`.`phone` LIKE ?"
        );
        assert_eq!(condition.wheres[0].args, vec![SqlValue::from("%ann%"); 4]);

        assert_eq!(condition.joins.len(), 1);
        let join = &condition.joins[0];
        assert_eq!(join.kind, JoinKind::Inner);
        assert_eq!(
            join.on,
            "INNER JOIN `sys_role_users` ON `sys_role_users`.`user_id` = `sys_users`.`id`"
        );
        assert_eq!(
            join.condition.wheres,
            vec![Fragment::new(
                "`sys_role_users`.`role_id` = ?",
                vec![SqlValue::Int(5)]
            )]
        );
        assert!(condition.orders.is_empty());
        assert!(condition.ors.is_empty());
    }

    #[test]
    fn test_no_role_means_no_join() {
        let query: SysUserPageQuery = serde_json::from_str(r#"{"username": "root"}"#).unwrap();
        let condition = build_condition(Driver::Mysql, &query);
        assert!(condition.joins.is_empty());
        assert_eq!(condition.wheres[0].sql, "`sys_users`.`username` = ?");
    }

    #[test]
    fn test_exclude_role_filter() {
        let query = SysUserPageQuery {
            exclude_role_id: 3,
            ..Default::default()
        };
        let filters = query.extra_filters(Driver::Postgres);
        assert_eq!(
            filters,
            vec![Fragment::new(
                "NOT EXISTS (SELECT 1 FROM \"sys_role_users\" WHERE \"sys_users\".\"id\" = \
                 \"sys_role_users\".\"user_id\" AND \"sys_role_users\".\"role_id\" = ?)",
                vec![SqlValue::Int(3)]
            )]
        );
        assert!(SysUserPageQuery::default().extra_filters(Driver::Mysql).is_empty());
    }
}
