//! Test doubles for the status source.
//!
//! `MockFs` stands in for `/proc` underneath a real `ProcStatusEngine`;
//! `ScriptedEngine` replaces the engine entirely.

mod filesystem;
mod scripted;

pub use filesystem::MockFs;
pub use scripted::ScriptedEngine;
