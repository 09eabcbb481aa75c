//! Field-level access to vertex records inside a raw byte buffer.
//!
//! [`VertexRecordCodec`] knows the record stride, the field offsets from
//! [`format`](crate::format) and the buffer's [`ByteOrder`]. Every accessor
//! checks the vertex index against the buffer length before touching any
//! bytes, so a bad index fails with [`BufferError::OutOfBounds`] instead of
//! reading or clobbering a neighbouring record.
//!
//! ```
//! use baked_buffer::{BlockVertex, ByteOrder, VertexRecordCodec};
//!
//! let vertex = BlockVertex::new([1.0, 2.0, 3.0], [200, 0, 0, 255], [0.5, 0.25], 7);
//! let mut bytes = bytemuck::bytes_of(&vertex).to_vec();
//!
//! let codec = VertexRecordCodec::new(ByteOrder::Native);
//! assert_eq!(codec.read_position(&bytes, 0).unwrap(), (1.0, 2.0, 3.0));
//!
//! codec.write_uv(&mut bytes, 0, 0.75, 0.5).unwrap();
//! assert_eq!(codec.read_uv(&bytes, 0).unwrap(), (0.75, 0.5));
//! assert!(codec.read_uv(&bytes, 1).is_err());
//! ```

use crate::error::{BufferError, BufferResult};
use crate::format::{ByteOrder, COLOR_OFFSET, LIGHT_OFFSET, POSITION_OFFSET, STRIDE, UV_OFFSET, WORD};

/// One of the four 8-bit color channels of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl ColorChannel {
    fn offset(self) -> usize {
        COLOR_OFFSET
            + match self {
                ColorChannel::Red => 0,
                ColorChannel::Green => 1,
                ColorChannel::Blue => 2,
                ColorChannel::Alpha => 3,
            }
    }
}

/// Reads and writes typed fields of fixed-stride vertex records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexRecordCodec {
    order: ByteOrder,
}

impl VertexRecordCodec {
    /// A codec for records stored in `order`.
    pub fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    /// Byte order of every multi-byte field.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Number of whole records in `buffer`.
    pub fn vertex_count(buffer: &[u8]) -> usize {
        buffer.len() / STRIDE
    }

    /// Byte offset of the start of record `index`, checked against `buffer`.
    fn record(buffer: &[u8], index: usize) -> BufferResult<usize> {
        let vertex_count = Self::vertex_count(buffer);
        if index >= vertex_count {
            return Err(BufferError::OutOfBounds {
                index,
                vertex_count,
            });
        }
        Ok(index * STRIDE)
    }

    fn get_word(&self, buffer: &[u8], at: usize) -> u32 {
        let mut word = [0u8; WORD];
        word.copy_from_slice(&buffer[at..at + WORD]);
        self.order.decode(word)
    }

    fn put_word(&self, buffer: &mut [u8], at: usize, value: u32) {
        buffer[at..at + WORD].copy_from_slice(&self.order.encode(value));
    }

    fn get_float(&self, buffer: &[u8], at: usize) -> f32 {
        f32::from_bits(self.get_word(buffer, at))
    }

    fn put_float(&self, buffer: &mut [u8], at: usize, value: f32) {
        self.put_word(buffer, at, value.to_bits());
    }

    /// Position of record `index` as `(x, y, z)`.
    pub fn read_position(&self, buffer: &[u8], index: usize) -> BufferResult<(f32, f32, f32)> {
        let at = Self::record(buffer, index)? + POSITION_OFFSET;
        Ok((
            self.get_float(buffer, at),
            self.get_float(buffer, at + WORD),
            self.get_float(buffer, at + 2 * WORD),
        ))
    }

    /// One byte of the color of record `index`.
    pub fn read_color_channel(
        &self,
        buffer: &[u8],
        index: usize,
        channel: ColorChannel,
    ) -> BufferResult<u8> {
        let at = Self::record(buffer, index)?;
        Ok(buffer[at + channel.offset()])
    }

    /// All four channels as `[r, g, b, a]`.
    pub fn read_color(&self, buffer: &[u8], index: usize) -> BufferResult<[u8; 4]> {
        let at = Self::record(buffer, index)? + COLOR_OFFSET;
        let mut color = [0u8; 4];
        color.copy_from_slice(&buffer[at..at + 4]);
        Ok(color)
    }

    /// Texture coordinates of record `index` as `(u, v)`.
    pub fn read_uv(&self, buffer: &[u8], index: usize) -> BufferResult<(f32, f32)> {
        let at = Self::record(buffer, index)? + UV_OFFSET;
        Ok((self.get_float(buffer, at), self.get_float(buffer, at + WORD)))
    }

    /// Packed light value of record `index`.
    pub fn read_light(&self, buffer: &[u8], index: usize) -> BufferResult<u32> {
        let at = Self::record(buffer, index)? + LIGHT_OFFSET;
        Ok(self.get_word(buffer, at))
    }

    /// Overwrites the position of record `index`.
    pub fn write_position(
        &self,
        buffer: &mut [u8],
        index: usize,
        x: f32,
        y: f32,
        z: f32,
    ) -> BufferResult<()> {
        let at = Self::record(buffer, index)? + POSITION_OFFSET;
        self.put_float(buffer, at, x);
        self.put_float(buffer, at + WORD, y);
        self.put_float(buffer, at + 2 * WORD, z);
        Ok(())
    }

    /// Overwrites all four color bytes of record `index`.
    pub fn write_color(
        &self,
        buffer: &mut [u8],
        index: usize,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) -> BufferResult<()> {
        let at = Self::record(buffer, index)? + COLOR_OFFSET;
        buffer[at..at + 4].copy_from_slice(&[r, g, b, a]);
        Ok(())
    }

    /// Overwrites the texture coordinates of record `index`.
    pub fn write_uv(&self, buffer: &mut [u8], index: usize, u: f32, v: f32) -> BufferResult<()> {
        let at = Self::record(buffer, index)? + UV_OFFSET;
        self.put_float(buffer, at, u);
        self.put_float(buffer, at + WORD, v);
        Ok(())
    }

    /// Overwrites the packed light value of record `index`.
    pub fn write_light(&self, buffer: &mut [u8], index: usize, packed: u32) -> BufferResult<()> {
        let at = Self::record(buffer, index)? + LIGHT_OFFSET;
        self.put_word(buffer, at, packed);
        Ok(())
    }

    /// Copies the position bytes of record `index` from `from` to `to`
    /// without decoding them, so every bit pattern (`-0.0`, NaN payloads,
    /// infinities) survives.
    pub fn copy_position(&self, from: &[u8], to: &mut [u8], index: usize) -> BufferResult<()> {
        let src = Self::record(from, index)? + POSITION_OFFSET;
        let dst = Self::record(to, index)? + POSITION_OFFSET;
        to[dst..dst + 3 * WORD].copy_from_slice(&from[src..src + 3 * WORD]);
        Ok(())
    }
}
