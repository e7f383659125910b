//! Cross-cutting pieces shared by the server binary and its crates.

pub mod types;
pub mod utils;
