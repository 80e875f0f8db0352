use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;

use super::Pagination;

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct WxAuthorizerPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:contains;column:nick_name,principal_name;table:wx_authorizers")]
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::build_condition;
    use crate::data::sql::Driver;

    #[test]
    fn test_keyword_targets_authorizer_table() {
        let query: WxAuthorizerPageQuery =
            serde_json::from_str(r#"{"keyword": "shop"}"#).unwrap();
        let condition = build_condition(Driver::Mysql, &query);
        assert_eq!(
            condition.wheres[0].sql,
            "`wx_authorizers`.`nick_name` LIKE ? OR `wx_authorizers`.`principal_name` LIKE ?"
        );
    }
}
