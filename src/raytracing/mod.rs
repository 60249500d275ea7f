pub mod node_stack;
pub mod raytracing_on_cpu;
pub mod types;

#[cfg(feature = "cpu_render")]
pub mod render;


pub use crate::raytracing::raytracing_on_cpu::Raytracer;
pub use crate::raytracing::types::{
    TraversalConfig, TraversalEvent, TraversalStep, VoxelHit, TRAVERSAL_STACK_SIZE,
};
pub use crate::spatial::raytracing::Ray;

#[cfg(feature = "cpu_render")]
pub use crate::raytracing::render::{render_frame, Viewport};
