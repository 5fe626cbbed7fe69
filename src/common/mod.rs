//! Common types and collaborator interfaces
//!
//! This module contains the value types and traits shared by the game engine,
//! the transports and the command layer.

pub mod types;
pub mod traits;
