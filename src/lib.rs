//! # Baked Buffer
//!
//! **Draw one baked vertex buffer many times, each time somewhere else.**
//!
//! Block models are expensive to mesh but cheap to copy. This crate takes a
//! buffer of baked [`BlockVertex`] records and, per draw, writes a transformed
//! copy: moved and rotated, optionally tinted, re-mapped to another atlas
//! region and re-lit. The baked bytes are never modified, and the copy is
//! written into the same reused allocation every time.
//!
//! ## Quick Start
//!
//! ```
//! use baked_buffer::*;
//!
//! let baked = [
//!     BlockVertex::new([0.0, 0.0, 0.0], [200, 200, 200, 255], [0.0, 0.0], 0),
//!     BlockVertex::new([1.0, 0.0, 0.0], [200, 200, 200, 255], [1.0, 0.0], 0),
//!     BlockVertex::new([1.0, 1.0, 0.0], [255, 255, 255, 255], [1.0, 1.0], 0),
//! ];
//! let mut buffer = BufferTransformer::from_vertices(&baked);
//! let mut staging: Vec<u8> = Vec::new();
//!
//! for step in 0..4 {
//!     buffer
//!         .rotate_centered(Axis::Y, step as f32 * std::f32::consts::FRAC_PI_2)
//!         .translate(step as f32, 0.0, 0.0)
//!         .light_with(|_x, y, _z| pack_light(15, if y > 0.5 { 15 } else { 8 }))
//!         .render_into(&mut staging)
//!         .unwrap();
//! }
//!
//! assert_eq!(staging.len(), 4 * 3 * STRIDE);
//! ```
//!
//! ## Pieces
//!
//! - [`format`] — the 28-byte record layout and [`BlockVertex`]
//! - [`VertexRecordCodec`] — bounds-checked field access on raw bytes
//! - [`TransformState`] — the accumulated matrix and the optional passes
//! - [`BufferTransformer`] — the fluent API and `build`

pub mod codec;
mod config;
mod error;
pub mod format;
mod light;
mod region;
mod transform;
mod transformer;

pub use codec::{ColorChannel, VertexRecordCodec};
pub use config::BufferConfig;
pub use error::{BufferError, BufferResult};
pub use format::{BlockVertex, ByteOrder, STRIDE};
pub use light::{FULL_BRIGHT, LightSource, LighterError, VertexLighter, pack_light, unpack_light};
pub use region::{AtlasRegion, TextureRegion};
pub use transform::{Axis, Tint, TransformState};
pub use transformer::{BufferTransformer, BulkSink};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3};
