use crate::{
    octree::{Albedo, LeafPayload, OccupancyWord},
    raytracing::raytracing_on_cpu::Raytracer,
    spatial::{
        math::vector::{V3c, V3cf32},
        raytracing::Ray,
    },
};
use image::{Rgba, RgbaImage};
use std::time::Instant;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// The origin of the viewport, think of it as the position the eye
    pub origin: V3cf32,

    /// The direction the raycasts are based upon, think of it as wherever the eye looks
    pub direction: V3cf32,

    /// The direction pointing upwards on the looking glass, must not be parallel to `direction`
    pub up: V3cf32,

    /// The volume the viewport reaches to
    /// * `x` - looking glass width
    /// * `y` - looking glass height
    /// * `z` - the max depth of the viewport
    pub frustum: V3cf32,

    /// Field of View: the distance of the looking glass from the origin,
    /// the bigger it is the narrower the visible area
    pub fov: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: V3c::new(0., 0., -1000.),
            direction: V3c::new(0., 0., 1.),
            up: V3c::new(0., 1., 0.),
            frustum: V3c::new(4., 4., 4000.),
            fov: 3.,
        }
    }
}

impl Viewport {
    /// The ray through the center of the given pixel, `y` counting rows from the top of the image
    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        debug_assert!(
            x < width && y < height,
            "Pixel ({x}, {y}) is outside of the {width}x{height} image"
        );
        let direction = self.direction.normalized();
        let right = direction.cross(self.up).normalized();
        let up = right.cross(direction).normalized();
        let pixel_width = self.frustum.x / width as f32;
        let pixel_height = self.frustum.y / height as f32;
        let glass_bottom_left = self.origin + (direction * self.fov)
            - (up * (self.frustum.y / 2.))
            - (right * (self.frustum.x / 2.));

        let row_from_bottom = height.saturating_sub(y + 1);
        let glass_point = glass_bottom_left
            + right * ((x as f32 + 0.5) * pixel_width)
            + up * ((row_from_bottom as f32 + 0.5) * pixel_height);
        Ray::new(self.origin, glass_point - self.origin)
    }
}

/// Gradient from white at the horizon to light blue at the zenith
pub fn sky_color(ray: &Ray) -> Rgba<u8> {
    let t = 0.5 * (ray.direction().y + 1.);
    let color = V3c::unit(1. - t) + V3c::new(0.5, 0.7, 1.) * t;
    Rgba([
        (color.x * 255.) as u8,
        (color.y * 255.) as u8,
        (color.z * 255.) as u8,
        255,
    ])
}

/// Color of a single pixel: the voxel color under a directional light, or the sky on a miss
pub fn render_pixel<W, P>(
    raytracer: &Raytracer<W, P>,
    viewport: &Viewport,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Rgba<u8>
where
    W: OccupancyWord,
    P: LeafPayload<Payload = Albedo>,
{
    let ray = viewport.ray_for_pixel(x, y, width, height);
    match raytracer.get_by_ray(&ray) {
        Some(hit) if hit.impact_distance <= viewport.frustum.z => {
            let diffuse_light_direction = V3c::new(0., -1., 1.).normalized();
            // Both vectors are normalized, so the dot product is in range -1, +1
            let diffuse_light_strength =
                1. - (hit.impact_normal.dot(&diffuse_light_direction) / 2. + 0.5);
            Rgba([
                (hit.payload.r as f32 * diffuse_light_strength) as u8,
                (hit.payload.g as f32 * diffuse_light_strength) as u8,
                (hit.payload.b as f32 * diffuse_light_strength) as u8,
                255,
            ])
        }
        _ => sky_color(&ray),
    }
}

/// Renders the whole viewport into an image, every worker thread taking a band of rows.
/// * `worker_count` - number of threads, at least one is used and at most one for each row
pub fn render_frame<W, P>(
    raytracer: &Raytracer<W, P>,
    viewport: &Viewport,
    width: u32,
    height: u32,
    worker_count: usize,
) -> RgbaImage
where
    W: OccupancyWord,
    P: LeafPayload<Payload = Albedo>,
{
    let mut image = RgbaImage::new(width, height);
    if 0 == width || 0 == height {
        return image;
    }

    let start = Instant::now();
    let worker_count = worker_count.clamp(1, height as usize);
    let rows_per_band = (height as usize).div_ceil(worker_count);
    let row_bytes = width as usize * 4;
    let result = crossbeam::scope(|scope| {
        for (band_index, band) in image.chunks_mut(rows_per_band * row_bytes).enumerate() {
            scope.spawn(move |_| {
                for (row_in_band, row) in band.chunks_mut(row_bytes).enumerate() {
                    let y = (band_index * rows_per_band + row_in_band) as u32;
                    for (x, pixel) in row.chunks_mut(4).enumerate() {
                        let color = render_pixel(raytracer, viewport, x as u32, y, width, height);
                        pixel.copy_from_slice(&color.0);
                    }
                }
            });
        }
    });
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }

    log::info!(
        "Rendered {width}x{height} pixels with {worker_count} workers in {:?}",
        start.elapsed()
    );
    image
}
