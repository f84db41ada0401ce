//! Core data models for the league.

mod bracket;
mod ids;
mod matches;
mod player;
mod standing;
mod team;

pub use bracket::*;
pub use ids::*;
pub use matches::*;
pub use player::*;
pub use standing::*;
pub use team::*;
