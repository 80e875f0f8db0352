//! Admin list requests
//!
//! - `dto` - Filter bodies for each listable entity
//! - `entity` - Entity registry mapping names to tables and filters
//! - `types` - Request value types (ids, timestamps)

pub mod dto;
pub mod entity;
pub mod error;
pub mod types;

pub use entity::Entity;
pub use error::RequestError;
pub use types::FlexibleTime;
