use crate::game::RoleKind;
use thiserror::Error;

/// The result of attempting to configure a [Game](crate::game::Game) with invalid input.
///
/// Only configuration problems are reported as errors. Player-facing operations on a
/// running game fail quietly, and role actions report failure through
/// [ActionResult](crate::game::ActionResult).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("the role catalog is empty")]
    EmptyCatalog,
    #[error("required role ({0:?}) not found in the role catalog")]
    MissingRequiredRole(RoleKind),
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),
    #[error("invalid value {value:?} for setting {name}")]
    InvalidSetting { name: &'static str, value: String },
    #[error("minimum player count {min} exceeds maximum player count {max}")]
    InvalidPlayerRange { min: u64, max: u64 },
}
