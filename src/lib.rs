//! A CPU-resident triangle rasterizer.
//!
//! Vertex data is transformed through a [`core::vertex_processor::VertexProcessor`],
//! culled, projected and scan-converted by a [`core::rasterizer::Rasterizer`] into a
//! [`core::framebuffer::FrameBuffer`], shaded with flat, Gouraud or Phong
//! interpolation under any number of Blinn-Phong lights.

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{RasterError, Result};
