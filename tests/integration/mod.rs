//! Integration test modules for MasterGrid
//!
//! - grid: Builder, gestures, panic and shutdown behaviour
//! - settings: Reconfiguration, resize, layout queries

pub mod grid;
pub mod settings;
