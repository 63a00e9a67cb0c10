//! Object-cache dropin lifecycle
//!
//! The dropin is a rendered template with a single substitution point.
//! Rendering is kept apart from file handling so a template can be
//! checked without touching the backend.

pub mod template;
pub mod writer;

pub use template::{render, TemplateSource, PLACEHOLDER};
pub use writer::DropinWriter;
