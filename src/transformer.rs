//! Re-drawing a baked buffer with per-draw transforms.
//!
//! A [`BufferTransformer`] wraps a buffer of [`BlockVertex`] records that was
//! baked once (typically a block model) and lets each draw place, tint,
//! re-texture and re-light it without touching the baked bytes:
//!
//! ```
//! use baked_buffer::*;
//!
//! let quad = [
//!     BlockVertex::new([0.0, 0.0, 0.0], [255; 4], [0.0, 0.0], 0),
//!     BlockVertex::new([1.0, 0.0, 0.0], [255; 4], [1.0, 0.0], 0),
//!     BlockVertex::new([1.0, 1.0, 0.0], [255; 4], [1.0, 1.0], 0),
//!     BlockVertex::new([0.0, 1.0, 0.0], [255; 4], [0.0, 1.0], 0),
//! ];
//! let mut buffer = BufferTransformer::from_vertices(&quad);
//!
//! let bytes = buffer
//!     .rotate_centered(Axis::Y, std::f32::consts::PI)
//!     .translate(10.0, 64.0, -3.0)
//!     .color(0x3F76E4)
//!     .light(FULL_BRIGHT)
//!     .build()
//!     .unwrap();
//! assert_eq!(bytes.len(), 4 * STRIDE);
//! ```
//!
//! # Build lifecycle
//!
//! Configuration calls only record what the next [`build`] should do.
//! `build` walks every record once, writes the results into an output
//! buffer owned by the transformer, and then forgets the configuration: the
//! transform goes back to identity and the tint, UV shift and light passes
//! are switched off. Fields of a pass that did not run keep whatever the
//! output buffer held before, which is the baked data until some build
//! overwrites it.
//!
//! The output buffer is allocated once at construction and reused by every
//! build, so a frame that re-draws the same model costs no allocations.
//!
//! [`build`]: BufferTransformer::build

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use crate::codec::{ColorChannel, VertexRecordCodec};
use crate::config::BufferConfig;
use crate::error::{BufferError, BufferResult};
use crate::format::{BlockVertex, STRIDE};
use crate::light::{LightSource, LighterError, VertexLighter};
use crate::region::TextureRegion;
use crate::transform::{Axis, Tint, TransformState};

/// Receives the finished bytes of a build, e.g. a staging buffer that is
/// later uploaded to the GPU.
pub trait BulkSink {
    fn put_bulk_data(&mut self, bytes: &[u8]);
}

impl BulkSink for Vec<u8> {
    fn put_bulk_data(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// A baked vertex buffer plus a reusable, transformed copy of it.
///
/// Not synchronized: configuration and builds take `&mut self`, and the
/// slice returned by [`build`](Self::build) borrows the transformer until
/// the caller is done with it.
pub struct BufferTransformer {
    label: String,
    codec: VertexRecordCodec,
    source: Arc<[u8]>,
    output: Vec<u8>,
    state: TransformState,
}

impl BufferTransformer {
    /// Wraps baked bytes using the default [`BufferConfig`].
    ///
    /// Fails with [`BufferError::FormatMismatch`] if the length is not a
    /// whole number of records.
    pub fn new(source: impl Into<Arc<[u8]>>) -> BufferResult<Self> {
        Self::with_config(source, BufferConfig::default())
    }

    /// Wraps baked bytes with an explicit label and byte order.
    ///
    /// Fails with [`BufferError::FormatMismatch`] if the length is not a
    /// whole number of records.
    pub fn with_config(source: impl Into<Arc<[u8]>>, config: BufferConfig) -> BufferResult<Self> {
        let source = source.into();
        if source.len() % STRIDE != 0 {
            return Err(BufferError::FormatMismatch {
                len: source.len(),
                stride: STRIDE,
            });
        }

        Ok(Self::wrap(source, config))
    }

    /// Bakes typed vertices into a new transformer (native byte order).
    pub fn from_vertices(vertices: &[BlockVertex]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        Self::wrap(bytes.into(), BufferConfig::default())
    }

    /// Takes a source already known to hold whole records.
    fn wrap(source: Arc<[u8]>, config: BufferConfig) -> Self {
        let output = source.to_vec();
        tracing::debug!(
            label = %config.label,
            vertices = source.len() / STRIDE,
            byte_order = ?config.byte_order,
            "Wrapped baked buffer"
        );

        Self {
            label: config.label,
            codec: VertexRecordCodec::new(config.byte_order),
            source,
            output,
            state: TransformState::default(),
        }
    }

    /// Name used in log events.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of records in the baked buffer.
    pub fn vertex_count(&self) -> usize {
        VertexRecordCodec::vertex_count(&self.source)
    }

    /// The codec matching this buffer's byte order, for reading the output.
    pub fn codec(&self) -> VertexRecordCodec {
        self.codec
    }

    /// The baked bytes, never modified.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// The output bytes as of the last build.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// The configuration the next build will use.
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    /// The matrix accumulated for the next build.
    pub fn transform_matrix(&self) -> Mat4 {
        self.state.matrix()
    }

    /// Copies the baked bytes back over the output, undoing every build.
    pub fn restore_output(&mut self) -> &mut Self {
        self.output.copy_from_slice(&self.source);
        self
    }

    /// Moves every vertex by (`x`, `y`, `z`).
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.translate_vec(Vec3::new(x, y, z))
    }

    /// Same as [`translate`](Self::translate) with a vector offset.
    pub fn translate_vec(&mut self, offset: Vec3) -> &mut Self {
        self.state.translate(offset);
        self
    }

    /// Rotates `angle` radians about `axis` through the origin.
    pub fn rotate(&mut self, axis: Axis, angle: f32) -> &mut Self {
        self.state.rotate(axis, angle);
        self
    }

    /// Rotates about the center of the unit block, (0.5, 0.5, 0.5).
    pub fn rotate_centered(&mut self, axis: Axis, angle: f32) -> &mut Self {
        self.translate(-0.5, -0.5, -0.5)
            .rotate(axis, angle)
            .translate(0.5, 0.5, 0.5)
    }

    /// Moves texture coordinates baked against `from` onto `to`.
    pub fn shift_uv(&mut self, from: &impl TextureRegion, to: &impl TextureRegion) -> &mut Self {
        self.state.uv_shift = Some(Vec2::new(
            to.min_u() - from.min_u(),
            to.min_v() - from.min_v(),
        ));
        self
    }

    /// Moves texture coordinates baked against `from` onto position
    /// (`sheet_x`, `sheet_y`) of the sheet `to`.
    ///
    /// The target corner is `to` interpolated at `sheet * 16 / size`
    /// sixteenths on each axis, `size` being the sheet's texel width or
    /// height.
    pub fn shift_uv_to_sheet(
        &mut self,
        from: &impl TextureRegion,
        to: &impl TextureRegion,
        sheet_x: u32,
        sheet_y: u32,
    ) -> &mut Self {
        let u = to.interpolated_u(sheet_x as f32 * 16.0 / to.width() as f32);
        let v = to.interpolated_v(sheet_y as f32 * 16.0 / to.height() as f32);
        self.state.uv_shift = Some(Vec2::new(u - from.min_u(), v - from.min_v()));
        self
    }

    /// Cancels any UV shift configured for the next build.
    pub fn dont_shift_uv(&mut self) -> &mut Self {
        self.state.uv_shift = None;
        self
    }

    /// Writes the same packed light value into every vertex.
    pub fn light(&mut self, packed: u32) -> &mut Self {
        self.state.light = Some(LightSource::Constant(packed));
        self
    }

    /// Samples light per vertex at its transformed position.
    pub fn light_with<F>(&mut self, mut lighter: F) -> &mut Self
    where
        F: FnMut(f32, f32, f32) -> u32 + 'static,
    {
        self.try_light_with(move |x: f32, y: f32, z: f32| -> Result<u32, LighterError> {
            Ok(lighter(x, y, z))
        })
    }

    /// Like [`light_with`](Self::light_with) for lighters that can fail. A
    /// failure aborts the build with [`BufferError::Lighter`].
    pub fn try_light_with(&mut self, lighter: impl VertexLighter + 'static) -> &mut Self {
        self.state.light = Some(LightSource::Sampled(Box::new(lighter)));
        self
    }

    /// Tints by a packed `0xRRGGBB` color, scaled by each vertex's baked
    /// luminance.
    pub fn color(&mut self, rgb: u32) -> &mut Self {
        self.state.tint = Some(Tint::from_rgb(rgb));
        self
    }

    /// Rewrites the output buffer from the baked data and the current
    /// configuration, then resets the configuration.
    ///
    /// Returns the whole output buffer, ready to be copied or uploaded.
    ///
    /// If a sampled light source fails, vertices before the failing one keep
    /// their new values, later ones are left untouched, and the
    /// configuration is reset all the same.
    pub fn build(&mut self) -> BufferResult<&[u8]> {
        tracing::trace!(
            label = %self.label,
            tint = self.state.tint.is_some(),
            uv_shift = self.state.uv_shift.is_some(),
            light = self.state.light.is_some(),
            "Building baked buffer"
        );

        let result = self.rewrite();
        self.state.reset();
        result?;

        Ok(self.output.as_slice())
    }

    /// Builds and hands the bytes to `sink` in one go.
    pub fn render_into(&mut self, sink: &mut impl BulkSink) -> BufferResult<()> {
        let bytes = self.build()?;
        sink.put_bulk_data(bytes);
        Ok(())
    }

    fn rewrite(&mut self) -> BufferResult<()> {
        let codec = self.codec;
        let source = &self.source[..];
        let output = &mut self.output[..];
        let state = &mut self.state;
        // Matrix math turns -0.0 into 0.0 and infinities into NaN.
        let identity = state.is_identity();

        for index in 0..VertexRecordCodec::vertex_count(source) {
            let (x, y, z) = codec.read_position(source, index)?;
            let moved = if identity {
                codec.copy_position(source, output, index)?;
                Vec3::new(x, y, z)
            } else {
                let moved = state.apply(Vec3::new(x, y, z));
                codec.write_position(output, index, moved.x, moved.y, moved.z)?;
                moved
            };

            if let Some(tint) = state.tint {
                let luminance = codec.read_color_channel(source, index, ColorChannel::Red)?;
                let [r, g, b, a] = tint.shade(luminance);
                codec.write_color(output, index, r, g, b, a)?;
            }

            if let Some(shift) = state.uv_shift {
                let (u, v) = codec.read_uv(source, index)?;
                codec.write_uv(output, index, u + shift.x, v + shift.y)?;
            }

            if let Some(light) = state.light.as_mut() {
                let packed = light.sample(moved.x, moved.y, moved.z).map_err(|err| {
                    tracing::warn!(label = %self.label, index, "Light sampling failed: {}", err);
                    BufferError::Lighter { index, source: err }
                })?;
                codec.write_light(output, index, packed)?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for BufferTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferTransformer")
            .field("label", &self.label)
            .field("vertex_count", &self.vertex_count())
            .field("codec", &self.codec)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::pack_light;
    use crate::region::AtlasRegion;

    const EPSILON: f32 = 1e-5;

    fn vertex(position: [f32; 3], luminance: u8) -> BlockVertex {
        BlockVertex::new(position, [luminance, 0, 0, 128], [0.15, 0.25], 0)
    }

    fn cube_corners() -> BufferTransformer {
        BufferTransformer::from_vertices(&[
            vertex([0.0, 0.0, 0.0], 255),
            vertex([1.0, 0.0, 0.0], 128),
            vertex([1.0, 1.0, 1.0], 0),
            vertex([0.5, 0.5, 0.5], 64),
        ])
    }

    fn position(buffer: &BufferTransformer, index: usize) -> Vec3 {
        let (x, y, z) = buffer.codec().read_position(buffer.output(), index).unwrap();
        Vec3::new(x, y, z)
    }

    #[test]
    fn identity_build_copies_source() {
        let mut buffer = cube_corners();
        let source = buffer.source().to_vec();

        assert_eq!(buffer.build().unwrap(), &source[..]);
    }

    #[test]
    fn rejects_partial_records() {
        let err = BufferTransformer::new(vec![0u8; STRIDE + 3]).unwrap_err();
        assert!(matches!(err, BufferError::FormatMismatch { len: 31, stride: 28 }));
    }

    #[test]
    fn empty_buffer_builds_nothing() {
        let mut buffer = BufferTransformer::new(Vec::<u8>::new()).unwrap();
        assert_eq!(buffer.vertex_count(), 0);
        assert!(buffer.translate(1.0, 1.0, 1.0).build().unwrap().is_empty());
    }

    #[test]
    fn translate_back_and_forth() {
        let mut buffer = cube_corners();
        buffer
            .translate(3.25, -7.5, 100.0)
            .translate(-3.25, 7.5, -100.0)
            .build()
            .unwrap();

        assert!((position(&buffer, 2) - Vec3::ONE).length() < EPSILON);
    }

    #[test]
    fn translate_moves_every_vertex() {
        let mut buffer = cube_corners();
        buffer.translate(1.0, 2.0, 3.0).build().unwrap();

        assert_eq!(position(&buffer, 0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(position(&buffer, 2), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn zero_rotation_leaves_positions_exact() {
        let mut buffer = cube_corners();
        let source = buffer.source().to_vec();

        let bytes = buffer.rotate(Axis::Y, 0.0).build().unwrap();

        assert_eq!(bytes, &source[..]);
    }

    fn signed_zero_corner() -> BufferTransformer {
        BufferTransformer::from_vertices(&[
            BlockVertex::new([-0.0, 1.0, 2.0], [255; 4], [0.0, 0.0], 0),
            BlockVertex::new([0.0, -0.0, f32::INFINITY], [255; 4], [1.0, 1.0], 0),
        ])
    }

    #[test]
    fn negative_zero_survives_identity_build() {
        let mut buffer = signed_zero_corner();
        let source = buffer.source().to_vec();

        let bytes = buffer.build().unwrap();

        assert_eq!(bytes, &source[..]);
        assert_eq!(bytes[..4], (-0.0f32).to_ne_bytes());
    }

    #[test]
    fn negative_zero_survives_zero_rotation() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut buffer = signed_zero_corner();
            let source = buffer.source().to_vec();

            assert_eq!(buffer.rotate(axis, 0.0).build().unwrap(), &source[..]);
        }
    }

    #[test]
    fn identity_build_after_a_move_restores_exact_positions() {
        let mut buffer = signed_zero_corner();
        let source = buffer.source().to_vec();
        buffer.translate(1.0, 0.0, 0.0).build().unwrap();

        assert_eq!(buffer.build().unwrap(), &source[..]);
    }

    #[test]
    fn typed_and_raw_construction_agree() {
        let vertices = [
            BlockVertex::new([0.0, 0.0, 0.0], [9; 4], [0.5, 0.5], 3),
            BlockVertex::new([1.0, 2.0, 3.0], [8; 4], [0.25, 0.75], 4),
        ];
        let typed = BufferTransformer::from_vertices(&vertices);
        let raw = BufferTransformer::new(bytemuck::cast_slice::<BlockVertex, u8>(&vertices[..]).to_vec()).unwrap();

        assert_eq!(typed.source(), raw.source());
        assert_eq!(typed.output(), raw.output());
        assert_eq!(typed.label(), raw.label());
        assert_eq!(typed.codec(), raw.codec());
    }

    #[test]
    fn centered_rotation_keeps_block_center() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut buffer = cube_corners();
            buffer.rotate_centered(axis, 1.234).build().unwrap();

            assert!((position(&buffer, 3) - Vec3::splat(0.5)).length() < EPSILON);
        }
    }

    #[test]
    fn quarter_turn_about_y() {
        let mut buffer = cube_corners();
        buffer
            .rotate_centered(Axis::Y, std::f32::consts::FRAC_PI_2)
            .build()
            .unwrap();

        // +X swings round to -Z, so the (1,0,0) corner lands on the origin
        assert!(position(&buffer, 1).length() < EPSILON);
    }

    #[test]
    fn tint_scales_by_luminance() {
        let mut buffer = cube_corners();
        buffer.color(0xFFFFFF).build().unwrap();
        let codec = buffer.codec();
        assert_eq!(codec.read_color(buffer.output(), 0).unwrap(), [255, 255, 255, 255]);

        buffer.color(0x804020).build().unwrap();
        assert_eq!(codec.read_color(buffer.output(), 1).unwrap(), [64, 32, 16, 255]);
        assert_eq!(codec.read_color(buffer.output(), 2).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn shift_uv_between_regions() {
        let from = AtlasRegion::new(Vec2::new(0.1, 0.2), Vec2::new(0.2, 0.3), 16, 16);
        let to = AtlasRegion::new(Vec2::new(0.3, 0.5), Vec2::new(0.4, 0.6), 16, 16);
        let mut buffer = cube_corners();

        buffer.shift_uv(&from, &to).build().unwrap();

        let (u, v) = buffer.codec().read_uv(buffer.output(), 0).unwrap();
        assert!((u - 0.35).abs() < EPSILON);
        assert!((v - 0.55).abs() < EPSILON);
    }

    #[test]
    fn shift_uv_to_sheet_cell() {
        let from = AtlasRegion::new(Vec2::new(0.15, 0.25), Vec2::new(0.2, 0.3), 16, 16);
        let sheet = AtlasRegion::new(Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.25), 64, 32);
        let mut buffer = cube_corners();

        buffer.shift_uv_to_sheet(&from, &sheet, 2, 1).build().unwrap();

        let expected_u = sheet.interpolated_u(2.0 * 16.0 / 64.0);
        let expected_v = sheet.interpolated_v(16.0 / 32.0);
        let (u, v) = buffer.codec().read_uv(buffer.output(), 0).unwrap();
        assert!((u - expected_u).abs() < EPSILON);
        assert!((v - expected_v).abs() < EPSILON);
    }

    #[test]
    fn dont_shift_uv_cancels() {
        let from = AtlasRegion::new(Vec2::ZERO, Vec2::ONE, 16, 16);
        let to = AtlasRegion::new(Vec2::ONE, Vec2::splat(2.0), 16, 16);
        let mut buffer = cube_corners();
        let source = buffer.source().to_vec();

        let bytes = buffer.shift_uv(&from, &to).dont_shift_uv().build().unwrap();

        assert_eq!(bytes, &source[..]);
    }

    #[test]
    fn constant_light_everywhere() {
        let mut buffer = cube_corners();
        buffer.light(12345).build().unwrap();

        for index in 0..buffer.vertex_count() {
            assert_eq!(buffer.codec().read_light(buffer.output(), index).unwrap(), 12345);
        }
    }

    #[test]
    fn sampled_light_sees_transformed_position() {
        let mut buffer = cube_corners();
        buffer
            .translate(4.0, 9.0, 0.0)
            .light_with(|x, y, _z| pack_light(x as u32, y as u32))
            .build()
            .unwrap();

        let codec = buffer.codec();
        assert_eq!(codec.read_light(buffer.output(), 0).unwrap(), pack_light(4, 9));
        assert_eq!(codec.read_light(buffer.output(), 2).unwrap(), pack_light(5, 10));
    }

    #[test]
    fn sampled_light_without_transform_sees_baked_position() {
        let mut buffer = cube_corners();
        buffer
            .light_with(|x, y, _z| pack_light(x as u32, y as u32))
            .build()
            .unwrap();

        let codec = buffer.codec();
        assert_eq!(codec.read_light(buffer.output(), 2).unwrap(), pack_light(1, 1));
        assert_eq!(buffer.output()[..12], buffer.source()[..12]);
    }

    #[test]
    fn latest_light_call_wins() {
        let mut buffer = cube_corners();
        buffer.light_with(|_, _, _| 7).light(3).build().unwrap();

        assert_eq!(buffer.codec().read_light(buffer.output(), 1).unwrap(), 3);
    }

    #[test]
    fn failing_lighter_stops_the_pass() {
        let mut buffer = cube_corners();
        let mut calls = 0;
        let err = buffer
            .translate(1.0, 0.0, 0.0)
            .try_light_with(move |_: f32, _: f32, _: f32| -> Result<u32, LighterError> {
                calls += 1;
                if calls > 2 {
                    Err("light engine not ready".into())
                } else {
                    Ok(99)
                }
            })
            .build()
            .unwrap_err();

        assert!(matches!(err, BufferError::Lighter { index: 2, .. }));
        let codec = buffer.codec();
        assert_eq!(codec.read_light(buffer.output(), 1).unwrap(), 99);
        assert_eq!(codec.read_light(buffer.output(), 2).unwrap(), 0);
        // vertex 2 was moved before its light failed, vertex 3 never was
        assert_eq!(position(&buffer, 2), Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(position(&buffer, 3), Vec3::splat(0.5));
        // configuration is still consumed
        assert_eq!(buffer.transform_matrix(), Mat4::IDENTITY);
        assert!(buffer.state().light().is_none());
    }

    #[test]
    fn passes_reset_between_builds() {
        let mut buffer = cube_corners();
        buffer.translate(0.0, 5.0, 0.0).color(0x804020).light(1).build().unwrap();
        let first = buffer.output().to_vec();

        let second = buffer.build().unwrap().to_vec();

        let codec = buffer.codec();
        // colors and light stay as the first build wrote them
        assert_eq!(codec.read_color(&second, 1).unwrap(), codec.read_color(&first, 1).unwrap());
        assert_eq!(codec.read_light(&second, 1).unwrap(), 1);
        // but the position comes from the source under an identity transform
        assert_eq!(position(&buffer, 0), Vec3::ZERO);
        assert_eq!(buffer.transform_matrix(), Mat4::IDENTITY);
        assert!(buffer.state().tint().is_none());
    }

    #[test]
    fn restore_output_undoes_builds() {
        let mut buffer = cube_corners();
        buffer.color(0x00FF00).light(5).build().unwrap();
        assert_ne!(buffer.output(), buffer.source());

        buffer.restore_output();

        assert_eq!(buffer.output(), buffer.source());
    }

    #[test]
    fn render_into_appends_to_sink() {
        let mut buffer = cube_corners();
        let mut sink = vec![0xAAu8];

        buffer.render_into(&mut sink).unwrap();

        assert_eq!(sink.len(), 1 + 4 * STRIDE);
        assert_eq!(&sink[1..], buffer.source());
    }

    #[test]
    fn big_endian_source() {
        let mut bytes = vec![0u8; STRIDE];
        bytes[..4].copy_from_slice(&2.0f32.to_be_bytes());
        let config = BufferConfig::new().byte_order(crate::ByteOrder::Big);
        let mut buffer = BufferTransformer::with_config(bytes, config).unwrap();

        let out = buffer.translate(1.0, 0.0, 0.0).build().unwrap();

        assert_eq!(out[..4], 3.0f32.to_be_bytes());
    }
}
