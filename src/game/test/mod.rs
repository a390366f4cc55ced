//! Tests for the Werewolf game engine, one submodule per area of the rules.

#![cfg(test)]

pub mod player_management;
pub mod role_actions;
pub mod test_utils;
