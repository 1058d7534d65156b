//! Request handlers for the three user actions.
//!
//! Each handler runs to completion and returns a [`Render`] describing what
//! the presentation layer should show. Input problems (schema, parse, form)
//! are rendered as error blocks; only classifier faults are returned as
//! `Err`.

mod advice;
mod handlers;
mod render;

pub use advice::*;
pub use handlers::*;
pub use render::*;
