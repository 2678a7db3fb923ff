//! Wavg Types
//!
//! This crate defines the value types shared across the wavg workspace
//! (currently `wavg-calculator`, `wavg-core` and `wavg-cli`). Request parameters and
//! document field values both travel as `ParamValue`, which keeps the script layer free
//! of any JSON dependency.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(missing_docs)]

mod types;
pub use types::{ParamValue, Params};
