//! # facetwork
//!
//! Library half of the Facetwork binary: the CLI commands and the demo
//! domain they inspect. Exposed so integration tests can drive commands
//! without spawning a process.

pub mod cli;
pub mod demo;
