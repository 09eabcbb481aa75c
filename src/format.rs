//! The baked block vertex record and its byte layout.
//!
//! Every buffer handled by this crate is a tightly packed array of 28-byte
//! records. The layout is fixed and shared with whoever baked the buffer and
//! whoever uploads it:
//!
//! | Field       | Format    | Offset | Shader Location |
//! |-------------|-----------|--------|-----------------|
//! | position    | Float32x3 | 0      | 0               |
//! | color       | Unorm8x4  | 12     | 1               |
//! | uv          | Float32x2 | 16     | 2               |
//! | light       | Uint32    | 24     | 3               |
//!
//! The offsets below are the single source of truth. [`BlockVertex`] mirrors
//! them as a `#[repr(C)]` struct, and the compile-time assertions at the
//! bottom of this file keep the two in lockstep.

use std::mem::{offset_of, size_of};

/// Byte offset of `position.x` within a record.
pub const POSITION_OFFSET: usize = 0;
/// Byte offset of the first color channel (red) within a record.
pub const COLOR_OFFSET: usize = 12;
/// Byte offset of `uv.u` within a record.
pub const UV_OFFSET: usize = 16;
/// Byte offset of the packed light value within a record.
pub const LIGHT_OFFSET: usize = 24;

/// Size in bytes of one vertex record.
pub const STRIDE: usize = 28;

/// Width of one `f32` / `u32` field component.
pub(crate) const WORD: usize = 4;

/// A single baked vertex as it sits in a buffer.
///
/// Use this to build source buffers from typed data; the transformer itself
/// only ever sees the bytes.
///
/// # Example
///
/// ```
/// use baked_buffer::{BlockVertex, STRIDE};
///
/// let quad = [
///     BlockVertex::new([0.0, 0.0, 0.0], [255; 4], [0.0, 0.0], 0x00F0_00F0),
///     BlockVertex::new([1.0, 0.0, 0.0], [255; 4], [1.0, 0.0], 0x00F0_00F0),
/// ];
/// let bytes: &[u8] = bytemuck::cast_slice(&quad);
/// assert_eq!(bytes.len(), 2 * STRIDE);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// RGBA color. The red channel doubles as baked luminance for tinting.
    pub color: [u8; 4],
    /// Texture coordinates into the block atlas.
    pub uv: [f32; 2],
    /// Packed block/sky light, see [`pack_light`](crate::pack_light).
    pub light: u32,
}

impl BlockVertex {
    /// The wgpu vertex buffer layout matching [`STRIDE`] and the field offsets.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: STRIDE as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: POSITION_OFFSET as u64,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: COLOR_OFFSET as u64,
                shader_location: 1,
                format: wgpu::VertexFormat::Unorm8x4,
            },
            // uv
            wgpu::VertexAttribute {
                offset: UV_OFFSET as u64,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
            // light
            wgpu::VertexAttribute {
                offset: LIGHT_OFFSET as u64,
                shader_location: 3,
                format: wgpu::VertexFormat::Uint32,
            },
        ],
    };

    /// A record from its four fields.
    pub fn new(position: [f32; 3], color: [u8; 4], uv: [f32; 2], light: u32) -> Self {
        Self {
            position,
            color,
            uv,
            light,
        }
    }
}

/// Byte order of multi-byte fields in a buffer.
///
/// Must match the order the source buffer was written in. Buffers produced
/// with `bytemuck` from [`BlockVertex`] are always [`ByteOrder::Native`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
    /// Whatever the host platform uses.
    #[default]
    Native,
}

impl ByteOrder {
    pub(crate) fn decode(self, bytes: [u8; WORD]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
            ByteOrder::Native => u32::from_ne_bytes(bytes),
        }
    }

    pub(crate) fn encode(self, value: u32) -> [u8; WORD] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }
}

const _: () = assert!(size_of::<BlockVertex>() == STRIDE);
const _: () = assert!(offset_of!(BlockVertex, position) == POSITION_OFFSET);
const _: () = assert!(offset_of!(BlockVertex, color) == COLOR_OFFSET);
const _: () = assert!(offset_of!(BlockVertex, uv) == UV_OFFSET);
const _: () = assert!(offset_of!(BlockVertex, light) == LIGHT_OFFSET);
const _: () = assert!(LIGHT_OFFSET + WORD == STRIDE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_record() {
        assert_eq!(BlockVertex::LAYOUT.array_stride, STRIDE as u64);
        assert_eq!(BlockVertex::LAYOUT.attributes.len(), 4);
    }

    #[test]
    fn byte_order_round_trips_through_each_variant() {
        for order in [ByteOrder::Little, ByteOrder::Big, ByteOrder::Native] {
            assert_eq!(order.decode(order.encode(0xDEAD_BEEF)), 0xDEAD_BEEF);
        }
        assert_eq!(ByteOrder::Big.encode(1), [0, 0, 0, 1]);
        assert_eq!(ByteOrder::Little.encode(1), [1, 0, 0, 0]);
    }
}
