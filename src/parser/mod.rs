mod api;
pub mod ast;
#[cfg(test)]
mod unit_tests;
pub mod util;

pub use api::{parse_path, PathParser, Rule};
