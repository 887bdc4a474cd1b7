//! StoryLines Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that every bounded
//! context depends on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod id;
pub mod repository;
pub mod rng;
