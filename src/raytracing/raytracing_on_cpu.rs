use crate::{
    octree::{
        detail::{ROOT_BIT_OFFSET, ROOT_SUBTREE_OFFSET},
        LeafPayload, OccupancyStore, OccupancyWord, StoreError,
    },
    raytracing::{
        node_stack::NodeStack,
        types::{TraversalConfig, TraversalEvent, TraversalFrame, TraversalStep, VoxelHit},
    },
    spatial::{
        math::octant_index,
        raytracing::{cube_impact_normal, Interval, Ray},
        Node,
    },
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Walks an occupancy store along rays, looking for the first occupied leaf.
/// The store is only borrowed, so any number of threads may trace through the same instance.
#[derive(Debug)]
pub struct Raytracer<'a, W: OccupancyWord, P: LeafPayload> {
    store: &'a OccupancyStore<W>,
    payload_source: P,
    config: TraversalConfig,
    iteration_limit_reported: AtomicBool,
}

impl<'a, W: OccupancyWord, P: LeafPayload> Raytracer<'a, W, P> {
    /// Creates a raytracer after validating the traversal parameters against the store layout
    pub fn new(
        store: &'a OccupancyStore<W>,
        payload_source: P,
        config: TraversalConfig,
    ) -> Result<Self, StoreError> {
        config.validate(store.config())?;
        log::debug!(
            "Raytracer over depth {} with bias {} and iteration limit {}",
            store.max_depth(),
            config.bias,
            config.iteration_limit
        );
        Ok(Self {
            store,
            payload_source,
            config,
            iteration_limit_reported: AtomicBool::new(false),
        })
    }

    /// Creates a raytracer with the bias and iteration limit derived from the store layout
    pub fn with_default_config(
        store: &'a OccupancyStore<W>,
        payload_source: P,
    ) -> Result<Self, StoreError> {
        Self::new(
            store,
            payload_source,
            TraversalConfig::for_store(store.config()),
        )
    }

    pub fn store(&self) -> &OccupancyStore<W> {
        self.store
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn payload_source(&self) -> &P {
        &self.payload_source
    }

    /// Provides the first occupied leaf the given ray touches, if any
    pub fn get_by_ray(&self, ray: &Ray) -> Option<VoxelHit<P::Payload>> {
        self.trace(ray, |_| {})
    }

    /// The hit record of `leaf`, with `local_distance` measured along `local_ray`,
    /// which starts `entry_distance` along the traced ray
    fn make_hit(
        &self,
        local_ray: &Ray,
        leaf: Node,
        depth: u32,
        bit_offset: u64,
        entry_distance: f32,
        local_distance: f32,
    ) -> VoxelHit<P::Payload> {
        let impact_point = local_ray.point_at(local_distance);
        let coordinate = self.store.leaf_coordinate(&leaf);
        VoxelHit {
            leaf,
            coordinate,
            depth,
            bit_offset,
            impact_distance: entry_distance + local_distance,
            impact_point,
            impact_normal: cube_impact_normal(&leaf, &impact_point),
            payload: self.payload_source.payload(&leaf, &coordinate),
        }
    }

    fn report_iteration_limit(&self, ray: &Ray) {
        if !self.iteration_limit_reported.swap(true, Ordering::Relaxed) {
            log::error!(
                "Traversal exceeded {} iterations, treating the ray as a miss: {ray:?}",
                self.config.iteration_limit
            );
        }
    }

    /// Distance the sampling point is moved past `t`, at least a few ulps so it never rounds back onto `t`
    fn nudge(&self, t: f32) -> f32 {
        self.config.bias.max(t.abs() * f32::EPSILON * 4.)
    }

    /// Traces the given ray, reporting every state transition to the inspector.
    /// The traversal keeps an entry distance `t_min`, which never decreases, and
    /// in each iteration does one of the following:
    /// * Pop: the sampling point left the current node, so continue inside its parent
    /// * Push: the child under the sampling point is occupied, so descend into it
    /// * Advance: the child under the sampling point is empty, so move `t_min` to its exit
    ///
    /// Distances inside the loop are measured from where the ray enters the root,
    /// so their precision does not depend on how far the ray origin is from the octree.
    pub fn trace<F>(&self, ray: &Ray, mut inspector: F) -> Option<VoxelHit<P::Payload>>
    where
        F: FnMut(&TraversalEvent),
    {
        let max_depth = self.store.max_depth();
        let root = self.store.root_node();
        let world_interval = root.intersect_ray(ray);

        // Geometry behind the ray origin is never reported
        let entry_distance = world_interval.t_min.max(0.);
        if entry_distance >= world_interval.t_max || !self.store.is_root_occupied() {
            return None;
        }

        let local_ray = ray.advanced(entry_distance);
        let root_interval = root.intersect_ray(&local_ray);
        let mut interval = Interval {
            t_min: root_interval.t_min.max(0.),
            t_max: root_interval.t_max,
        };
        if interval.t_min + self.nudge(interval.t_min) >= interval.t_max {
            return None;
        }

        let event = |step, depth, t_min: f32| TraversalEvent {
            step,
            depth,
            t_min: entry_distance + t_min,
        };

        if 0 == max_depth {
            inspector(&event(TraversalStep::Hit, 0, interval.t_min));
            return Some(self.make_hit(
                &local_ray,
                root,
                0,
                ROOT_BIT_OFFSET,
                entry_distance,
                interval.t_min,
            ));
        }

        let mut node_stack: NodeStack<TraversalFrame> = NodeStack::default();
        node_stack
            .push(TraversalFrame {
                node: root,
                depth: 0,
                exit_distance: root_interval.t_max,
                subtree_offset: ROOT_SUBTREE_OFFSET,
            })
            .ok()?;

        let mut iteration: u32 = 0;
        loop {
            iteration += 1;
            if iteration > self.config.iteration_limit {
                self.report_iteration_limit(ray);
                return None;
            }

            let current = *node_stack.last()?;
            let sample_distance = interval.t_min + self.nudge(interval.t_min);
            if sample_distance >= root_interval.t_max {
                inspector(&event(TraversalStep::Exit, current.depth, interval.t_min));
                return None;
            }

            if sample_distance >= interval.t_max {
                if node_stack.len() <= 1 {
                    inspector(&event(TraversalStep::Exit, current.depth, interval.t_min));
                    return None;
                }
                node_stack.pop();
                let parent = node_stack.last()?;
                interval.t_max = parent.exit_distance;
                inspector(&event(TraversalStep::Pop, parent.depth, interval.t_min));
                continue;
            }

            let sample_point = local_ray.point_at(sample_distance);
            let octant = octant_index(&(sample_point - current.node.center));
            let child = current.node.child(octant);
            let child_interval = child.intersect_ray(&local_ray);
            let child_bit = self
                .store
                .child_offset(current.subtree_offset, current.depth, octant);
            let child_depth = current.depth + 1;
            let child_occupied = self.store.is_occupied(child_bit);

            if child_occupied && child_depth == max_depth && interval.t_min < child_interval.t_max
            {
                inspector(&event(TraversalStep::Hit, child_depth, interval.t_min));
                return Some(self.make_hit(
                    &local_ray,
                    child,
                    child_depth,
                    child_bit,
                    entry_distance,
                    interval.t_min.max(child_interval.t_min),
                ));
            }

            // A child left within the nudge would be popped right after the push
            if child_occupied && sample_distance < child_interval.t_max {
                node_stack
                    .push(TraversalFrame {
                        node: child,
                        depth: child_depth,
                        exit_distance: child_interval.t_max,
                        subtree_offset: child_bit + 1,
                    })
                    .ok()?;
                interval.t_max = child_interval.t_max;
                inspector(&event(TraversalStep::Push, child_depth, interval.t_min));
            } else {
                interval.t_min = child_interval.t_max.max(sample_distance);
                inspector(&event(TraversalStep::Advance, current.depth, interval.t_min));
            }
        }
    }
}
