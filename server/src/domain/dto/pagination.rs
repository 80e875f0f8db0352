use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::constants::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::data::search::{Page, SortPreset, paginate};

/// Page selection shared by every list request
///
/// `sort` is an optional preset code (`"1"`..`"5"`) applied when the filter
/// itself sets no order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_page_index")]
    #[validate(range(min = 1, message = "pageIndex must be >= 1"))]
    pub page_index: i64,

    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: i64,

    #[serde(default)]
    pub sort: String,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            sort: String::new(),
        }
    }
}

impl Pagination {
    pub fn page(&self) -> Page {
        paginate(self.page_size, self.page_index)
    }

    pub fn sort_preset(&self) -> SortPreset {
        SortPreset::from_code(&self.sort)
    }
}

fn default_page_index() -> i64 {
    DEFAULT_PAGE_INDEX
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn validate_page_size(size: i64) -> Result<(), ValidationError> {
    if size < 1 || size > MAX_PAGE_SIZE {
        return Err(ValidationError::new("page_size_range")
            .with_message(format!("pageSize must be between 1 and {}", MAX_PAGE_SIZE).into()));
    }
    Ok(())
}
