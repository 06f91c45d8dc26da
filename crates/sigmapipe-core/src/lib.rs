//! # Sigmapipe core
//!
//! Domain model and configuration shared by the sigmapipe crates:
//! MISP attributes carrying Sigma signatures, the supported conversion
//! targets, and the pipeline configuration loaded at startup.

pub mod config;
pub mod model;

pub use config::*;
pub use model::*;
