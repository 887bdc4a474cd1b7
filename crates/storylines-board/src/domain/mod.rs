//! Domain layer: entities, the `Book` aggregate, commands and events.

pub mod aggregates;
pub mod commands;
pub mod defaults;
pub mod events;
pub mod model;
