//! Crop yield prediction web service.
//!
//! A form collects five agronomic inputs, a random forest trained at startup
//! predicts the harvest, and every prediction is logged to SQLite. Simple
//! username/password accounts sit alongside.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod ml;
pub mod model;
pub mod schema;
pub mod server;
pub mod session;
pub mod views;
