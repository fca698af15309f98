//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (shader build, missing uniform, bad geometry)
//! - 11: I/O error (shader or config file)
//! - 12: input error (bad config values or flags)
//! - 13: driver error (residual error after a guarded call; aborts the loop)
//! - 14: window or context creation failure

use quad_renderer_core::RenderError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Building or drawing the quad failed.
    Render(RenderError),
    /// A file could not be read.
    Io(String),
    /// A configuration value or flag was invalid.
    Input(String),
    /// The driver reported an error after a guarded call.
    Driver(String),
    /// The window or GL context could not be created.
    Window(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Driver(_) => 13,
            CliError::Window(_) => 14,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Driver(msg) => write!(f, "{msg}"),
            CliError::Window(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(msg) => CliError::Io(msg),
            RenderError::Config(msg) => CliError::Input(msg),
            RenderError::Driver(e) => CliError::Driver(e.to_string()),
            RenderError::Surface(msg) => CliError::Window(msg),
            other => CliError::Render(other),
        }
    }
}
