//! Rendering + concurrency core: glyph atlas/cache, sprite synthesis,
//! surface/IO, render pipeline, window/coordinator topology, selection,
//! and scrollbar.

pub mod app;
pub mod atlas;
pub mod coordinator;
pub mod error;
pub mod font_impl;
pub mod fonts;
pub mod glyph_cache;
pub mod pty;
pub mod render_pipeline;
pub mod scrollbar;
pub mod selection;
pub mod sprites;
pub mod surface;
pub mod terminal;
pub mod window;

pub use error::{PhanttyError, Result};
