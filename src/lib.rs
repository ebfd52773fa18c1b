//! Chefify Library
//!
//! Recipe image search with a persistent query cache and retrying search
//! client. The binary is a thin terminal front end over these modules.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod query;
pub mod search;
pub mod ui;
