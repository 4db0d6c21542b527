//! Command-line interface module.

mod args;
pub mod describe;
pub mod inject;
pub mod plan;
pub mod toc;

pub use args::{Cli, Commands};
