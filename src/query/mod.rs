//! Query execution for rangeview.
//!
//! The façade is the only path from the page to the engine.

pub mod facade;

pub use facade::QueryFacade;
