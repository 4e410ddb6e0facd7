//! Utilities shared by the quizduel crates: logging setup and time helpers.

pub mod logger;
pub mod time;
