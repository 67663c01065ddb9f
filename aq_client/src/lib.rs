//! Terminal client library for the AcademIQ learning platform.
//!
//! Exposes the prompt command parser and the [`app::App`] that runs
//! commands against the backend, so both can be tested without a terminal.

pub mod app;
pub mod commands;
