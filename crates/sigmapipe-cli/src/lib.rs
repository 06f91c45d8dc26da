//! # Sigmapipe CLI library
//!
//! The polling loop that drives the relay: query MISP, persist each
//! signature, convert it with sigmac, and import es-rule output into
//! Kibana.

pub mod poller;

pub use poller::*;
