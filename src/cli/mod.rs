pub mod args;
pub mod interactive;

pub use args::{CliArgs, RunParams};
