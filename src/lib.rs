//! ecs-search - Signed item-search client for the Amazon E-Commerce Service
//!
//! Builds Signature Version 2 requests, sends them, and streams the XML
//! responses into ordered, typed result sets.

pub mod commands;
pub mod config;
pub mod ecs;
pub mod error;
pub mod format;

pub use config::Config;
pub use ecs::{EcsConnection, Item, ItemSearch, Locale, Params, ResultSet};
pub use error::{EcsError, XmlError};
