#[cfg(test)]
mod ray_tests {
    use crate::spatial::{
        math::vector::V3c,
        raytracing::{Ray, RAY_DIRECTION_EPSILON},
    };

    #[test]
    fn test_axis_aligned_direction_is_clamped() {
        let ray = Ray::new(V3c::unit(0.), V3c::new(1., 0., 0.));
        assert!(ray.is_valid());
        assert_eq!(RAY_DIRECTION_EPSILON, ray.direction().y);
        assert_eq!(RAY_DIRECTION_EPSILON, ray.direction().z);
        assert!(ray.inverse_direction().is_finite());
        assert!(0. < ray.inverse_direction().y);
    }

    #[test]
    fn test_clamping_keeps_sign_of_negative_zero() {
        let ray = Ray::new(V3c::unit(0.), V3c::new(0., -1., -0.));
        assert_eq!(RAY_DIRECTION_EPSILON, ray.direction().x);
        assert_eq!(-RAY_DIRECTION_EPSILON, ray.direction().z);
        assert!(ray.inverse_direction().z < 0.);
    }

    #[test]
    fn test_advanced_ray_keeps_its_direction() {
        let ray = Ray::new(V3c::new(1., 2., 3.), V3c::new(0., 0., -2.));
        let advanced = ray.advanced(5.);
        assert!((advanced.origin() - V3c::new(1., 2., -2.)).length() < 0.00001);
        assert!(advanced.direction() == ray.direction());
        assert!(advanced.inverse_direction() == ray.inverse_direction());
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(V3c::unit(0.), V3c::new(3., 4., 0.));
        assert!(ray.is_valid());
        assert!((ray.direction().x - 0.6).abs() < 0.000001);
        assert!((ray.direction().y - 0.8).abs() < 0.000001);
        assert_eq!(RAY_DIRECTION_EPSILON, ray.direction().z);
    }

    #[test]
    fn test_zero_direction_is_absorbed() {
        let ray = Ray::new(V3c::new(1., 2., 3.), V3c::unit(0.));
        assert!(ray.is_valid());
        assert!(ray.inverse_direction().is_finite());
        assert!(0. < ray.direction().x && 0. < ray.direction().y && 0. < ray.direction().z);
    }

    #[test]
    fn test_point_at() {
        let ray = Ray::new(V3c::new(1., 0., 0.), V3c::new(0., 0., 2.));
        let point = ray.point_at(3.);
        assert!((point.z - 3.).abs() < 0.000001);
        assert!((point.x - 1.).abs() < 0.000001);
    }
}

#[cfg(test)]
mod intersection_tests {
    use crate::spatial::{
        math::vector::V3c,
        raytracing::{cube_impact_normal, Ray},
        Node,
    };

    fn cube_of_4() -> Node {
        Node::new(V3c::unit(2.), 4.)
    }

    #[test]
    fn test_cube_intersect_from_above_and_below() {
        let cube = cube_of_4();
        let ray_above = Ray::new(V3c::new(2., 5., 2.), V3c::new(0., -1., 0.));
        let hit = cube.intersect_ray(&ray_above);
        assert!(hit.is_hit());
        assert!((hit.t_min - 1.).abs() < 0.0001);
        assert!((hit.t_max - 5.).abs() < 0.0001);

        let ray_below = Ray::new(V3c::new(2., -5., 2.), V3c::new(0., 1., 0.));
        let hit = cube.intersect_ray(&ray_below);
        assert!(hit.is_hit());
        assert!((hit.t_min - 5.).abs() < 0.0001);
        assert!((hit.t_max - 9.).abs() < 0.0001);
    }

    #[test]
    fn test_cube_intersect_miss() {
        let cube = cube_of_4();
        let ray_still_miss = Ray::new(V3c::unit(-1.), V3c::new(1., 100., 1.));
        assert!(!cube.intersect_ray(&ray_still_miss).is_hit());

        let ray_beside = Ray::new(V3c::new(6., 5., 2.), V3c::new(0., -1., 0.));
        assert!(!cube.intersect_ray(&ray_beside).is_hit());
    }

    #[test]
    fn test_cube_behind_ray_origin() {
        let cube = cube_of_4();
        let ray_away = Ray::new(V3c::new(2., 10., 2.), V3c::new(0., 1., 0.));
        let hit = cube.intersect_ray(&ray_away);
        assert!(hit.t_max < 0., "cube should only be intersected behind the origin");
    }

    #[test]
    fn test_ray_origin_inside_cube() {
        let cube = cube_of_4();
        let ray = Ray::new(V3c::unit(1.), V3c::unit(1.));
        let hit = cube.intersect_ray(&ray);
        assert!(hit.t_min < 0.);
        assert!(0. < hit.t_max);
        assert!((ray.point_at(hit.t_max).x - 4.).abs() < 0.0001);
    }

    #[test]
    fn test_corner_hit() {
        let cube = cube_of_4();
        let ray = Ray::new(V3c::unit(-1.), V3c::unit(1.));
        let hit = cube.intersect_ray(&ray);
        assert!(hit.is_hit());
        assert!(ray.point_at(hit.t_min).length() < 0.0001);
    }

    #[test]
    fn test_grazing_face_resolves_by_direction_sign() {
        let cube = cube_of_4();

        // travelling on the z = 0 face, leaning inwards
        let ray_inwards = Ray::new(V3c::new(2., 5., 0.), V3c::new(0., -1., 0.));
        assert!(cube.intersect_ray(&ray_inwards).is_hit());

        // travelling on the z = 0 face, leaning outwards
        let ray_outwards = Ray::new(V3c::new(2., 5., 0.), V3c::new(0., -1., -0.));
        assert!(!cube.intersect_ray(&ray_outwards).is_hit());

        // travelling on the z = 4 face, leaning outwards
        let ray_on_far_face = Ray::new(V3c::new(2., 5., 4.), V3c::new(0., -1., 0.));
        assert!(!cube.intersect_ray(&ray_on_far_face).is_hit());
    }

    #[test]
    fn test_edge_case_cube_top_hit() {
        let ray = Ray::new(
            V3c::new(8.965594, 10.0, -4.4292345),
            V3c::new(-0.5082971, -0.72216684, 0.46915793),
        );
        let hit = Node::new(V3c::new(3., 1., 1.), 2.).intersect_ray(&ray);
        assert!(hit.is_hit());
        assert!((hit.t_min - 11.077772).abs() < 0.001);
        assert!((ray.point_at(hit.t_min).y - 2.).abs() < 0.001);
    }

    #[test]
    fn test_impact_normal() {
        let cube = Node::new(V3c::unit(1.), 2.);
        assert!(V3c::new(0., 0., 1.) == cube_impact_normal(&cube, &V3c::new(1., 1., 2.)));
        assert!(V3c::new(-1., 0., 0.) == cube_impact_normal(&cube, &V3c::new(0., 1.2, 0.5)));
        assert!(V3c::new(0., 1., 0.) == cube_impact_normal(&cube, &V3c::new(1., 1., 1.)));
    }
}
