//! Normalize classification labels in observation exports, split them into
//! labeled and unlabeled sets, and index labels across merged exports.

pub mod app;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use error::{CurateError, Result};
