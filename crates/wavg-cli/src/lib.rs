//! Library side of the `wavg` binary: argument definitions, request loading and the
//! subcommand implementations, kept apart from `main` so they can be tested in-process.

pub mod cli;
pub mod commands;
pub mod request;

pub use cli::{Cli, Command, ScriptArgs};
pub use request::Request;
