//! collect: inspect layered configuration from the command line
//!
//! Resolves flags and labeled config files the same way a host program
//! using the `collect` library would, and prints the result.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
