use crate::spatial::{math::vector::V3c, Node};

mod tests;

/// Direction components smaller than this in magnitude are replaced by it, keeping their sign
pub const RAY_DIRECTION_EPSILON: f32 = 1. / 8_388_608.; // 2^-23

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: V3c<f32>,
    direction: V3c<f32>,
    inverse_direction: V3c<f32>,
}

impl Ray {
    /// Creates a ray with a unit direction, none of its components being zero.
    /// Degenerate directions are absorbed here, so traversal never divides by zero:
    /// each component below `RAY_DIRECTION_EPSILON` is replaced by a signed epsilon,
    /// where `+0.0` keeps a positive and `-0.0` a negative sign.
    /// A zero length direction ends up pointing towards +xyz.
    pub fn new(origin: V3c<f32>, direction: V3c<f32>) -> Self {
        debug_assert!(
            direction.is_finite(),
            "Ray direction must be finite: {direction:?}"
        );
        let direction = Self::clamp_components(Self::clamp_components(direction).normalized());
        Self {
            origin,
            direction,
            inverse_direction: direction.recip(),
        }
    }

    fn clamp_components(direction: V3c<f32>) -> V3c<f32> {
        V3c::new(
            Self::clamp_component(direction.x),
            Self::clamp_component(direction.y),
            Self::clamp_component(direction.z),
        )
    }

    fn clamp_component(component: f32) -> f32 {
        if component.is_nan() {
            RAY_DIRECTION_EPSILON
        } else if component.abs() < RAY_DIRECTION_EPSILON {
            RAY_DIRECTION_EPSILON.copysign(component)
        } else {
            component
        }
    }

    pub fn origin(&self) -> V3c<f32> {
        self.origin
    }

    pub fn direction(&self) -> V3c<f32> {
        self.direction
    }

    pub fn inverse_direction(&self) -> V3c<f32> {
        self.inverse_direction
    }

    pub fn is_valid(&self) -> bool {
        (1. - self.direction.length()).abs() < 0.000001
    }

    pub fn point_at(&self, d: f32) -> V3c<f32> {
        self.origin + self.direction * d
    }

    /// The same ray, with its origin moved `d` along the direction
    pub fn advanced(&self, d: f32) -> Ray {
        Ray {
            origin: self.point_at(d),
            ..*self
        }
    }
}

/// Signed distances along a ray where it enters and exits a volume.
/// The volume is intersected only if `t_min < t_max`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Interval {
    pub t_min: f32,
    pub t_max: f32,
}

impl Interval {
    pub fn is_hit(&self) -> bool {
        self.t_min < self.t_max
    }
}

impl Node {
    /// Slab test of the given ray against the cube.
    /// Boundaries are picked by the sign of the ray direction per axis, so the
    /// crossing first on the ray is always `near` and there is no need to swap:
    /// the latest entry is `t_min` and the earliest exit is `t_max`.
    /// https://gamedev.stackexchange.com/questions/18436/most-efficient-aabb-vs-ray-collision-algorithms
    pub fn intersect_ray(&self, ray: &Ray) -> Interval {
        let half_extent = ray.direction.signum() * self.half_size();
        let near = (self.center - half_extent - ray.origin) * ray.inverse_direction;
        let far = (self.center + half_extent - ray.origin) * ray.inverse_direction;
        Interval {
            t_min: near.max_element(),
            t_max: far.min_element(),
        }
    }
}

/// Normal of the cube face the given point is closest to
pub fn cube_impact_normal(cube: &Node, impact_point: &V3c<f32>) -> V3c<f32> {
    let mid_to_impact = cube.center - *impact_point;
    let max_component = mid_to_impact
        .x
        .abs()
        .max(mid_to_impact.y.abs())
        .max(mid_to_impact.z.abs());

    let impact_normal = V3c::new(
        if mid_to_impact.x.abs() == max_component {
            -mid_to_impact.x
        } else {
            0.
        },
        if mid_to_impact.y.abs() == max_component {
            -mid_to_impact.y
        } else {
            0.
        },
        if mid_to_impact.z.abs() == max_component {
            -mid_to_impact.z
        } else {
            0.
        },
    );

    if 0. < impact_normal.length() {
        impact_normal.normalized()
    } else {
        // impact point is the center of the cube
        V3c::new(0., 1., 0.)
    }
}
