//! Domain layer types and invariants.

pub mod sheet;
pub mod text;
pub mod week;
