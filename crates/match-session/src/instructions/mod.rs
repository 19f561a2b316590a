//! Match instruction handlers

pub mod player;
pub mod resolution;
pub mod tiebreak;

pub use player::*;
pub use resolution::*;
pub use tiebreak::*;
