//! Pagination, sort presets and the soft-delete scope

use serde::{Deserialize, Serialize};

use crate::data::sql::Driver;

use super::condition::Fragment;

/// Row window applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

/// Offset/limit for a 1-based page index; the offset is never negative
pub fn paginate(page_size: i64, page_index: i64) -> Page {
    let page_size = page_size.max(0);
    let offset = page_index.saturating_sub(1).saturating_mul(page_size).max(0);
    Page {
        offset: u64::try_from(offset).unwrap_or(0),
        limit: u64::try_from(page_size).unwrap_or(0),
    }
}

/// Named sort orders selected by a numeric code in list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreset {
    #[default]
    IdDesc,
    IdAsc,
    UpdatedDesc,
    UpdatedAsc,
    PinnedThenUpdated,
}

impl SortPreset {
    /// Unknown codes fall back to `id desc`
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Self::IdDesc,
            "2" => Self::IdAsc,
            "3" => Self::UpdatedDesc,
            "4" => Self::UpdatedAsc,
            "5" => Self::PinnedThenUpdated,
            _ => Self::IdDesc,
        }
    }

    fn terms(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::IdDesc => &[("id", "desc")],
            Self::IdAsc => &[("id", "asc")],
            Self::UpdatedDesc => &[("updated_at", "desc")],
            Self::UpdatedAsc => &[("updated_at", "asc")],
            Self::PinnedThenUpdated => &[("is_pin", "desc"), ("updated_at", "desc")],
        }
    }

    /// ORDER BY terms qualified with `table`
    pub fn orders(&self, driver: Driver, table: &str) -> Vec<String> {
        let dialect = driver.dialect();
        self.terms()
            .iter()
            .map(|(column, direction)| format!("{} {}", dialect.column(table, column), direction))
            .collect()
    }
}

/// `deleted = 0` on `table`
pub fn not_deleted(driver: Driver, table: &str) -> Fragment {
    let column = driver.dialect().column(table, "deleted");
    Fragment::new(format!("{} = 0", column), Vec::new())
}
