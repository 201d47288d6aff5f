//! User-defined function discovery and resolution.
//!
//! # Submodules
//!
//! - [`extract`] - Function references from script text
//! - [`registry`] - Registry collaborators holding function sources
//! - [`resolve`] - Attaching sources and refining languages
//! - [`classify`] - Splitting functions by packaging strategy

pub mod classify;
pub mod extract;
pub mod registry;
pub mod resolve;
mod types;

pub use types::*;
