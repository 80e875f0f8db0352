//! List request filters for the admin entities
//!
//! Each filter is a JSON request body: pagination fields, column filters
//! declared with `#[search(...)]` and optional order fields.

mod pagination;
mod sys_config;
mod sys_dict;
mod sys_permission;
mod sys_role;
mod sys_sms;
mod sys_user;
mod wx_authorizer;

pub use pagination::Pagination;
pub use sys_config::{ConfigOrder, SysConfigLogPageQuery, SysConfigPageQuery};
pub use sys_dict::{DictItemOrder, DictOrder, SysDictItemPageQuery, SysDictPageQuery};
pub use sys_permission::{PermissionOrder, SysPermissionPageQuery};
pub use sys_role::{RoleOrder, SysRolePageQuery};
pub use sys_sms::{SmsLogOrder, SysSmsLogPageQuery};
pub use sys_user::{OwnRole, SysUserPageQuery, UserOrder};
pub use wx_authorizer::WxAuthorizerPageQuery;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::data::search::{Fragment, Search};
use crate::data::sql::Driver;

/// A paged list request
pub trait PageQuery: Search + DeserializeOwned + Validate {
    fn pagination(&self) -> &Pagination;

    /// Filters that cannot be expressed as field directives
    fn extra_filters(&self, _driver: Driver) -> Vec<Fragment> {
        Vec::new()
    }
}

macro_rules! page_query {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PageQuery for $ty {
                fn pagination(&self) -> &Pagination {
                    &self.pagination
                }
            }
        )*
    };
}

page_query!(
    SysRolePageQuery,
    SysPermissionPageQuery,
    SysConfigPageQuery,
    SysConfigLogPageQuery,
    SysDictPageQuery,
    SysDictItemPageQuery,
    SysSmsLogPageQuery,
    WxAuthorizerPageQuery,
);
