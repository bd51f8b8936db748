//! `lifestyle-impacts` library crate.
//!
//! The binary (`impacts`) is a thin wrapper around this library so that the
//! pipeline stages can be tested without spawning processes or touching the
//! network:
//!
//! - `input`: state and keyword resolution
//! - `data`: case-count and search-interest fetches
//! - `process`: cleaning and the weekly join
//! - `plot`: chart preparation and PNG rendering
//! - `app`: CLI dispatch and the end-to-end run

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod input;
pub mod io;
pub mod logging;
pub mod plot;
pub mod process;
pub mod report;
