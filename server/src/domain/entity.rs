//! Entity registry
//!
//! Maps each listable entity to its table and filter type and builds the
//! page and count statements for a JSON request body.

use std::fmt;

use validator::Validate;

use crate::data::search::{
    ListQuery, QueryCondition, SearchError, SelectBuilder, resolve_search_query, resolve_strict,
    validate_search,
};
use crate::data::sql::Driver;

use super::dto::{
    PageQuery, SysConfigLogPageQuery, SysConfigPageQuery, SysDictItemPageQuery, SysDictPageQuery,
    SysPermissionPageQuery, SysRolePageQuery, SysSmsLogPageQuery, SysUserPageQuery,
    WxAuthorizerPageQuery,
};
use super::error::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Users,
    Roles,
    Permissions,
    Configs,
    ConfigLogs,
    Dicts,
    DictItems,
    SmsLogs,
    WxAuthorizers,
}

impl Entity {
    pub const ALL: [Entity; 9] = [
        Entity::Users,
        Entity::Roles,
        Entity::Permissions,
        Entity::Configs,
        Entity::ConfigLogs,
        Entity::Dicts,
        Entity::DictItems,
        Entity::SmsLogs,
        Entity::WxAuthorizers,
    ];

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Roles => "roles",
            Entity::Permissions => "permissions",
            Entity::Configs => "configs",
            Entity::ConfigLogs => "config-logs",
            Entity::Dicts => "dicts",
            Entity::DictItems => "dict-items",
            Entity::SmsLogs => "sms-logs",
            Entity::WxAuthorizers => "wx-authorizers",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Entity::Users => "sys_users",
            Entity::Roles => "sys_roles",
            Entity::Permissions => "sys_permissions",
            Entity::Configs => "sys_configs",
            Entity::ConfigLogs => "sys_config_logs",
            Entity::Dicts => "sys_dicts",
            Entity::DictItems => "sys_dict_items",
            Entity::SmsLogs => "sys_sms_logs",
            Entity::WxAuthorizers => "wx_authorizers",
        }
    }

    /// Accepts the short name or the table name, case-insensitive
    pub fn parse(s: &str) -> Result<Self, RequestError> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s || e.table() == s)
            .ok_or(RequestError::UnknownEntity(s))
    }

    /// Rows are soft-deleted through a `deleted` flag
    pub fn soft_deleted(&self) -> bool {
        matches!(self, Entity::Dicts)
    }

    /// Build the page and count statements for a JSON request body
    ///
    /// An empty body is treated as `{}`. In strict mode malformed directives
    /// are reported instead of skipped.
    pub fn select(
        &self,
        driver: Driver,
        body: &str,
        strict: bool,
    ) -> Result<ListQuery, RequestError> {
        match self {
            Entity::Users => self.select_with::<SysUserPageQuery>(driver, body, strict),
            Entity::Roles => self.select_with::<SysRolePageQuery>(driver, body, strict),
            Entity::Permissions => self.select_with::<SysPermissionPageQuery>(driver, body, strict),
            Entity::Configs => self.select_with::<SysConfigPageQuery>(driver, body, strict),
            Entity::ConfigLogs => self.select_with::<SysConfigLogPageQuery>(driver, body, strict),
            Entity::Dicts => self.select_with::<SysDictPageQuery>(driver, body, strict),
            Entity::DictItems => self.select_with::<SysDictItemPageQuery>(driver, body, strict),
            Entity::SmsLogs => self.select_with::<SysSmsLogPageQuery>(driver, body, strict),
            Entity::WxAuthorizers => {
                self.select_with::<WxAuthorizerPageQuery>(driver, body, strict)
            }
        }
    }

    /// Validate the directives declared on this entity's filter
    pub fn check(&self) -> Result<(), SearchError> {
        match self {
            Entity::Users => validate_search(&SysUserPageQuery::default()),
            Entity::Roles => validate_search(&SysRolePageQuery::default()),
            Entity::Permissions => validate_search(&SysPermissionPageQuery::default()),
            Entity::Configs => validate_search(&SysConfigPageQuery::default()),
            Entity::ConfigLogs => validate_search(&SysConfigLogPageQuery::default()),
            Entity::Dicts => validate_search(&SysDictPageQuery::default()),
            Entity::DictItems => validate_search(&SysDictItemPageQuery::default()),
            Entity::SmsLogs => validate_search(&SysSmsLogPageQuery::default()),
            Entity::WxAuthorizers => validate_search(&WxAuthorizerPageQuery::default()),
        }
    }

    fn select_with<Q: PageQuery>(
        &self,
        driver: Driver,
        body: &str,
        strict: bool,
    ) -> Result<ListQuery, RequestError> {
        let body = if body.trim().is_empty() { "{}" } else { body };
        let query: Q = serde_json::from_str(body)?;
        Validate::validate(&query)?;

        let mut condition = QueryCondition::new();
        if strict {
            resolve_strict(driver, &query, &mut condition)?;
        } else {
            resolve_search_query(driver, &query, &mut condition);
        }

        let mut builder = SelectBuilder::new(driver, self.table()).condition(condition);
        for fragment in query.extra_filters(driver) {
            builder = builder.filter(fragment);
        }
        if self.soft_deleted() {
            builder = builder.not_deleted();
        }

        let pagination = query.pagination();
        tracing::debug!(
            entity = self.name(),
            driver = %driver,
            page_index = pagination.page_index,
            page_size = pagination.page_size,
            "Building list query"
        );
        Ok(builder
            .page(pagination.page())
            .fallback_order(pagination.sort_preset())
            .list())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
