//! Configuration module
//!
//! Settings for the backend endpoints, the initial map view, render colors
//! and the ambient features, stored as TOML in the user config directory.

pub mod config;
