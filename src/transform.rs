//! Per-build configuration: the accumulated transform and the optional passes.
//!
//! [`TransformState`] is what the fluent calls on
//! [`BufferTransformer`](crate::BufferTransformer) write into and what
//! `build` reads. It holds:
//!
//! - an affine [`Mat4`], identity until `translate`/`rotate` compose into it
//! - an optional UV shift
//! - an optional [`Tint`]
//! - an optional [`LightSource`]
//!
//! # Composition order
//!
//! Translations add straight into the translation column, which is the same
//! as left-multiplying a translation matrix. Rotations left-multiply a fresh
//! rotation matrix. Both therefore apply *after* everything configured so
//! far, so calls read in the order they happen to the vertices:
//!
//! ```
//! use baked_buffer::{Axis, TransformState, Vec3};
//!
//! let mut state = TransformState::default();
//! state.translate(Vec3::new(-0.5, -0.5, -0.5));
//! state.rotate(Axis::Y, std::f32::consts::FRAC_PI_2);
//! state.translate(Vec3::splat(0.5));
//!
//! // (0.5, 0.5, 0.5) is the center of the unit cell and stays put
//! let center = state.apply(Vec3::splat(0.5));
//! assert!((center - Vec3::splat(0.5)).length() < 1e-6);
//! ```

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::light::LightSource;

/// One of the three principal axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Rotation-only matrix of `angle` radians about this axis.
    pub fn rotation(self, angle: f32) -> Mat4 {
        match self {
            Axis::X => Mat4::from_rotation_x(angle),
            Axis::Y => Mat4::from_rotation_y(angle),
            Axis::Z => Mat4::from_rotation_z(angle),
        }
    }
}

/// A uniform tint blended with each vertex's baked luminance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Tint {
    /// Splits a packed `0xRRGGBB` value; alpha is always opaque.
    pub fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 255,
        }
    }

    /// Scales the tint by the luminance stored in a vertex's red channel.
    ///
    /// The luminance byte is unsigned and normalized as `(lum + 1) / 256`,
    /// so a fully lit vertex (255) keeps the tint exactly and each channel
    /// is floored. Alpha passes through untouched.
    ///
    /// This is deliberately not the plain `lum / 256` curve: that one can
    /// never return 255 for a 255 channel, so a white tint would darken
    /// fully lit vertices.
    pub fn shade(&self, luminance: u8) -> [u8; 4] {
        let lum = (luminance as f32 + 1.0) / 256.0;
        let scale = |channel: u8| (channel as f32 * lum) as u8;
        [scale(self.r), scale(self.g), scale(self.b), self.a]
    }
}

/// Accumulated transform plus the optional passes for the next build.
#[derive(Debug)]
pub struct TransformState {
    pub(crate) transform: Mat4,
    pub(crate) uv_shift: Option<Vec2>,
    pub(crate) tint: Option<Tint>,
    pub(crate) light: Option<LightSource>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            uv_shift: None,
            tint: None,
            light: None,
        }
    }
}

impl TransformState {
    /// The accumulated transform.
    pub fn matrix(&self) -> Mat4 {
        self.transform
    }

    /// UV offset the next build adds, if any.
    pub fn uv_shift(&self) -> Option<Vec2> {
        self.uv_shift
    }

    /// Tint the next build applies, if any.
    pub fn tint(&self) -> Option<Tint> {
        self.tint
    }

    /// Light source the next build writes, if any.
    pub fn light(&self) -> Option<&LightSource> {
        self.light.as_ref()
    }

    /// Adds `offset` to the translation column.
    pub fn translate(&mut self, offset: Vec3) {
        self.transform.w_axis += Vec4::new(offset.x, offset.y, offset.z, 0.0);
    }

    /// Composes a rotation after the current transform. A zero angle is a
    /// no-op and leaves the matrix bit-for-bit unchanged.
    pub fn rotate(&mut self, axis: Axis, angle: f32) {
        if angle == 0.0 {
            return;
        }
        self.transform = axis.rotation(angle) * self.transform;
    }

    /// True when the matrix is exactly identity, so positions can be
    /// copied instead of transformed.
    pub fn is_identity(&self) -> bool {
        self.transform == Mat4::IDENTITY
    }

    /// Applies the accumulated transform to a point (w = 1, no divide).
    pub fn apply(&self, position: Vec3) -> Vec3 {
        self.transform.transform_point3(position)
    }

    /// Clears everything a build consumes.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
