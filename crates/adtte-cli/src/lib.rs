//! Command-line front end for ADTTE Kaplan-Meier analysis.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
