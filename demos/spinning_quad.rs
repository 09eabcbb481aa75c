//! Bakes a single block face once, then re-draws it around a ring the way a
//! renderer would each frame: rotate, place, tint, re-light, and append the
//! bytes to a staging buffer that would go to the GPU.

use baked_buffer::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // The north face of a unit block, baked with a little ambient occlusion
    // in the red channel.
    let face = [
        BlockVertex::new([0.0, 0.0, 0.0], [180, 180, 180, 255], [0.0, 0.0], 0),
        BlockVertex::new([1.0, 0.0, 0.0], [180, 180, 180, 255], [1.0, 0.0], 0),
        BlockVertex::new([1.0, 1.0, 0.0], [255, 255, 255, 255], [1.0, 1.0], 0),
        BlockVertex::new([0.0, 1.0, 0.0], [255, 255, 255, 255], [0.0, 1.0], 0),
    ];

    let stone = AtlasRegion::from_grid(256, 16, 0, 0);
    let planks = AtlasRegion::from_grid(256, 16, 4, 0);

    let mut buffer = BufferTransformer::from_vertices(&face);
    let mut staging: Vec<u8> = Vec::with_capacity(8 * face.len() * STRIDE);

    for step in 0..8 {
        let angle = step as f32 * std::f32::consts::FRAC_PI_4;
        let (x, z) = (angle.cos() * 4.0, angle.sin() * 4.0);

        buffer
            .rotate_centered(Axis::Y, angle)
            .translate(x, 64.0, z)
            .color(if step % 2 == 0 { 0xFFFFFF } else { 0xC0A080 })
            .light_with(|_x, y, _z| pack_light(if y > 64.5 { 15 } else { 10 }, 15));

        if step % 2 == 1 {
            buffer.shift_uv(&stone, &planks);
        }

        if let Err(err) = buffer.render_into(&mut staging) {
            tracing::error!("Failed to draw step {}: {}", step, err);
            return;
        }
    }

    let codec = buffer.codec();
    let vertices = staging.len() / STRIDE;
    for index in 0..vertices {
        if let (Ok(pos), Ok(color), Ok(light)) = (
            codec.read_position(&staging, index),
            codec.read_color(&staging, index),
            codec.read_light(&staging, index),
        ) {
            let (block, sky) = unpack_light(light);
            println!(
                "{:3}: pos ({:6.2}, {:6.2}, {:6.2})  rgba {:?}  light {}/{}",
                index, pos.0, pos.1, pos.2, color, block, sky
            );
        }
    }

    tracing::info!("Drew {} vertices from {} baked", vertices, buffer.vertex_count());
}
