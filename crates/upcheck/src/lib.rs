//! Host-facing layer of upcheck: command line, settings, logging, the
//! background check controller and result rendering.

pub mod cli;
pub mod controller;
pub mod error;
pub mod logging;
pub mod report;
pub mod settings;
