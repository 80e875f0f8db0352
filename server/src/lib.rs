//! Dynamic list queries for admin tables
//!
//! - `data` - Search directives, condition resolution, dialects and pools
//! - `domain` - Admin filter bodies and the entity registry
//! - `core` - CLI, configuration and constants

// Lets `#[derive(Search)]` expansions name this crate from inside it
extern crate self as orderin_server;

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
