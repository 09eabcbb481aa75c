//! Texture atlas regions, as seen by the UV shift pass.
//!
//! The transformer never looks inside an atlas. All it needs from a region
//! is its minimum corner, a way to interpolate across it, and its size in
//! pixels. [`TextureRegion`] captures exactly that; [`AtlasRegion`] is a plain
//! min/max rectangle implementing it for callers without their own sprite
//! type.

use glam::Vec2;

/// A rectangular sub-area of an atlas texture.
///
/// Interpolation offsets are measured in sixteenths of the region: `0.0` is
/// the minimum edge and `16.0` the maximum edge, regardless of how many
/// pixels the region spans.
pub trait TextureRegion {
    fn min_u(&self) -> f32;
    fn min_v(&self) -> f32;
    /// U coordinate `sixteenths / 16` of the way across the region.
    fn interpolated_u(&self, sixteenths: f32) -> f32;
    /// V coordinate `sixteenths / 16` of the way down the region.
    fn interpolated_v(&self, sixteenths: f32) -> f32;
    /// Width of the region in texels.
    fn width(&self) -> u32;
    /// Height of the region in texels.
    fn height(&self) -> u32;
}

/// A region described by its UV rectangle and pixel size.
///
/// # Example
///
/// ```
/// use baked_buffer::{AtlasRegion, TextureRegion, Vec2};
///
/// let region = AtlasRegion::new(Vec2::new(0.25, 0.5), Vec2::new(0.5, 0.75), 16, 16);
/// assert_eq!(region.interpolated_u(8.0), 0.375);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    /// Region spanning `min` to `max` in UV space over a `width` x `height`
    /// texel sheet.
    pub fn new(min: Vec2, max: Vec2, width: u32, height: u32) -> Self {
        Self {
            min,
            max,
            width,
            height,
        }
    }

    /// Region of a `tile`-pixel cell at grid position (`column`, `row`) of a
    /// square atlas `atlas_size` pixels wide.
    pub fn from_grid(atlas_size: u32, tile: u32, column: u32, row: u32) -> Self {
        let scale = 1.0 / atlas_size as f32;
        let min = Vec2::new((column * tile) as f32, (row * tile) as f32) * scale;
        let max = min + Vec2::splat(tile as f32 * scale);
        Self::new(min, max, tile, tile)
    }
}

impl TextureRegion for AtlasRegion {
    fn min_u(&self) -> f32 {
        self.min.x
    }

    fn min_v(&self) -> f32 {
        self.min.y
    }

    fn interpolated_u(&self, sixteenths: f32) -> f32 {
        self.min.x + (self.max.x - self.min.x) * sixteenths / 16.0
    }

    fn interpolated_v(&self, sixteenths: f32) -> f32 {
        self.min.y + (self.max.y - self.min.y) * sixteenths / 16.0
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_across_the_region() {
        let region = AtlasRegion::new(Vec2::new(0.0, 0.5), Vec2::new(0.5, 1.0), 32, 32);

        assert_eq!(region.interpolated_u(0.0), 0.0);
        assert_eq!(region.interpolated_u(16.0), 0.5);
        assert_eq!(region.interpolated_v(4.0), 0.625);
    }

    #[test]
    fn grid_cells() {
        let region = AtlasRegion::from_grid(256, 16, 2, 1);

        assert_eq!(region.min, Vec2::new(0.125, 0.0625));
        assert_eq!(region.max, Vec2::new(0.1875, 0.125));
        assert_eq!((region.width(), region.height()), (16, 16));
    }
}
