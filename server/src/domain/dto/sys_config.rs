use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;
use crate::domain::types::id_string;

use super::Pagination;

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysConfigPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:contains;column:name,description;table:sys_configs")]
    pub keyword: String,

    #[serde(flatten)]
    pub order: ConfigOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default)]
pub struct ConfigOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_configs")]
    pub config_id_order: String,
}

/// Change history of one config entry
#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysConfigLogPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[serde(with = "id_string")]
    #[validate(range(min = 1, message = "configId is required"))]
    #[search("type:exact;column:config_id;table:sys_config_logs")]
    pub config_id: i64,
}
