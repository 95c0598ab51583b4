//! Command-line front end for vxsearch.
//!
//! # Modules
//!
//! - [`cli`]: clap argument definitions
//! - [`config`]: `VxsearchConfig`, loaded via confyg
//! - [`app`]: logging setup, component wiring, and the search run

pub mod app;
pub mod cli;
pub mod config;

pub use app::{build_pipeline, init_logging, run};
pub use cli::CliArgs;
pub use config::VxsearchConfig;
