//! Operating system facing helpers for upcheck.
//!
//! Everything in here is resolved once per process by the host layer and then
//! handed to the core as plain values, so the core never branches on `cfg!`.

mod commands;
mod host;
mod paths;

pub use commands::{HideWindow, helper_command};
pub use host::HostPlatform;
pub use paths::{AppPaths, AppPathsError, resolve_temp_dir};
