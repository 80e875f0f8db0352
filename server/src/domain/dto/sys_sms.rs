use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;
use crate::domain::types::FlexibleTime;

use super::Pagination;

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysSmsLogPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:exact;column:phone;table:sys_sms_logs")]
    pub phone: String,

    #[serde(rename = "templateId")]
    #[search("type:exact;column:template_code;table:sys_sms_logs")]
    pub template_code: String,

    #[search("type:gt;column:created_at;table:sys_sms_logs")]
    pub created_at_start: FlexibleTime,

    #[search("type:lt;column:created_at;table:sys_sms_logs")]
    pub created_at_end: FlexibleTime,

    #[serde(flatten)]
    pub order: SmsLogOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default)]
pub struct SmsLogOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_sms_logs")]
    pub sms_log_id_order: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::{SqlValue, build_condition};
    use crate::data::sql::Driver;

    #[test]
    fn test_created_at_range() {
        let query: SysSmsLogPageQuery = serde_json::from_str(
            r#"{"templateId": "SMS_1", "createdAtStart": "2024-03-01", "createdAtEnd": 1709296200000}"#,
        )
        .unwrap();
        let condition = build_condition(Driver::Mysql, &query);
        let sql: Vec<&str> = condition.wheres.iter().map(|w| w.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "`sys_sms_logs`.`template_code` = ?",
                "`sys_sms_logs`.`created_at` > ?",
                "`sys_sms_logs`.`created_at` < ?",
            ]
        );
        assert_eq!(
            condition.wheres[1].args,
            vec![SqlValue::Timestamp(query.created_at_start.0)]
        );
    }

    #[test]
    fn test_open_range_skips_missing_bound() {
        let query: SysSmsLogPageQuery =
            serde_json::from_str(r#"{"createdAtEnd": "2024-03-01 08:00:00"}"#).unwrap();
        let condition = build_condition(Driver::Mysql, &query);
        assert_eq!(condition.wheres.len(), 1);
        assert_eq!(condition.wheres[0].sql, "`sys_sms_logs`.`created_at` < ?");
    }
}
