use serde::Deserialize;
use validator::Validate;

use crate::data::search::Search;

use super::Pagination;

/// Dictionaries are soft-deleted; see `Entity::soft_deleted`
#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysDictPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[search("type:contains;column:name,label,description;table:sys_dicts")]
    pub keyword: String,

    #[serde(flatten)]
    pub order: DictOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default)]
pub struct DictOrder {
    #[serde(rename = "idOrder")]
    #[search("type:order;column:id;table:sys_dicts")]
    pub dict_id_order: String,
}

#[derive(Debug, Default, Deserialize, Validate, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct SysDictItemPageQuery {
    #[serde(flatten)]
    #[search("-")]
    #[validate(nested)]
    pub pagination: Pagination,

    #[validate(length(min = 1, max = 50, message = "dictName must be 1-50 characters"))]
    #[search("type:exact;column:dict_name;table:sys_dict_items")]
    pub dict_name: String,

    #[search("type:contains;column:item_label,item_value,description;table:sys_dict_items")]
    pub keyword: String,

    #[serde(flatten)]
    pub order: DictItemOrder,
}

#[derive(Debug, Default, Deserialize, Search)]
#[serde(default, rename_all = "camelCase")]
pub struct DictItemOrder {
    #[search("type:order;column:sort;table:sys_dict_items")]
    pub sort_order: String,
}
