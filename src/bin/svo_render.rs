use svotrace_rs::{
    octree::{Albedo, ColorVolume, OccupancyStoreBuilder, StoreConfig, V3c},
    raytracing::{render_frame, Raytracer, Viewport},
};

const RESOLUTION: u32 = 512;

/// Renders a sphere resting on a checkered ground into a PNG file
/// usage: svo_render [output.png]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "svo_render.png".to_string());

    // fill the store with data
    let config = StoreConfig::cube(256., 6);
    let leaves_per_axis = config.leaves_per_axis();
    let mut builder = OccupancyStoreBuilder::<u32>::new(config)?;
    let mut colors = ColorVolume::new(&config)?;

    let sphere_center = V3c::new(32., 22., 32.);
    let sphere_radius = 18.;
    for x in 0..leaves_per_axis {
        for y in 0..leaves_per_axis {
            for z in 0..leaves_per_axis {
                let coordinate = V3c::new(x, y, z);
                let from_center = V3c::<f32>::from(coordinate) + V3c::unit(0.5) - sphere_center;
                let color = if y < 4 {
                    if 0 == (x / 8 + z / 8) % 2 {
                        Albedo::from([220, 220, 220, 255])
                    } else {
                        Albedo::from([60, 60, 70, 255])
                    }
                } else if from_center.length() < sphere_radius {
                    Albedo::default()
                        .with_red(200)
                        .with_green((x * 4) as u8)
                        .with_blue((z * 4) as u8)
                        .with_alpha(255)
                } else {
                    continue;
                };
                builder.insert(&coordinate)?;
                colors.set(&coordinate, color)?;
            }
        }
    }
    let store = builder.build();
    let raytracer = Raytracer::with_default_config(&store, &colors)?;

    // Set the viewport
    let origin = V3c::new(180., 120., -260.);
    let viewport = Viewport {
        origin,
        direction: (V3c::new(0., -40., 0.) - origin).normalized(),
        up: V3c::new(0., 1., 0.),
        frustum: V3c::new(4., 4., 2000.),
        fov: 5.,
    };

    let worker_count = std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4);
    let image = render_frame(&raytracer, &viewport, RESOLUTION, RESOLUTION, worker_count);
    image.save(&output)?;
    log::info!("Saved render to {output}");
    Ok(())
}
