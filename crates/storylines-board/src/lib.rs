//! StoryLines: Board bounded context.
//!
//! Owns the books of a library and, inside each book, the plotlines and the
//! single global scene order they share. Every mutation leaves scene
//! positions dense (`0..N-1`) and unique.

pub mod application;
pub mod domain;
