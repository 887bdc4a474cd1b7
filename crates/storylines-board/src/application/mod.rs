//! Application layer: the library repository and its command/query handlers.

pub mod command_handlers;
pub mod library;
pub mod query_handlers;
