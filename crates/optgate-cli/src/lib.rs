//! Optgate CLI: file handling and terminal output around the validator
pub mod commands;
pub mod io;
pub mod render;
