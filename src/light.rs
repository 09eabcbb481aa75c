//! Packed light values and the per-vertex light pass.
//!
//! A packed light value stores two channels in one `u32`: block light in the
//! low 16 bits and sky light in the high 16 bits. Each channel is a light
//! level (0–15) scaled by 16, so full brightness in both is `0x00F0_00F0`.

/// Error type produced by a failing [`VertexLighter`].
pub type LighterError = Box<dyn std::error::Error + Send + Sync>;

/// Brightest packed value: block and sky light both at level 15.
pub const FULL_BRIGHT: u32 = pack_light(15, 15);

/// Packs block and sky light levels (0–15) into a single value.
///
/// ```
/// use baked_buffer::{pack_light, unpack_light};
///
/// assert_eq!(pack_light(15, 15), 0x00F0_00F0);
/// assert_eq!(unpack_light(pack_light(7, 12)), (7, 12));
/// ```
pub const fn pack_light(block: u32, sky: u32) -> u32 {
    ((sky & 0xF) << 20) | ((block & 0xF) << 4)
}

/// Splits a packed value back into `(block, sky)` light levels.
pub const fn unpack_light(packed: u32) -> (u32, u32) {
    ((packed >> 4) & 0xF, (packed >> 20) & 0xF)
}

/// Computes a packed light value for a vertex from its final position.
///
/// The position passed in is the vertex after the accumulated transform has
/// been applied, so lighters can sample the world at the spot the vertex
/// will actually be drawn.
///
/// Any closure `FnMut(f32, f32, f32) -> Result<u32, LighterError>` is a
/// lighter. For infallible closures use
/// [`BufferTransformer::light_with`](crate::BufferTransformer::light_with).
pub trait VertexLighter {
    fn packed_light(&mut self, x: f32, y: f32, z: f32) -> Result<u32, LighterError>;
}

impl<F> VertexLighter for F
where
    F: FnMut(f32, f32, f32) -> Result<u32, LighterError>,
{
    fn packed_light(&mut self, x: f32, y: f32, z: f32) -> Result<u32, LighterError> {
        self(x, y, z)
    }
}

/// Where the light pass gets its values from.
pub enum LightSource {
    /// The same packed value for every vertex.
    Constant(u32),
    /// A value sampled per vertex at its transformed position.
    Sampled(Box<dyn VertexLighter>),
}

impl LightSource {
    pub(crate) fn sample(&mut self, x: f32, y: f32, z: f32) -> Result<u32, LighterError> {
        match self {
            LightSource::Constant(packed) => Ok(*packed),
            LightSource::Sampled(lighter) => lighter.packed_light(x, y, z),
        }
    }
}

impl std::fmt::Debug for LightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightSource::Constant(packed) => f.debug_tuple("Constant").field(packed).finish(),
            LightSource::Sampled(_) => f.write_str("Sampled(..)"),
        }
    }
}
