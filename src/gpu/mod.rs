//! GPU rendering: wgpu device/surface setup, pipelines, and the
//! `core::render_pipeline::FrameBatches` submission bridge.

pub mod core_bridge;
mod instance_writer;
pub mod pipeline;
pub mod state;

pub use core_bridge::CoreRenderer;
pub use state::GpuState;
