//! Bridge between the UI thread and the async entity client.

pub mod commands;
pub mod runtime;
