#[cfg(test)]
mod octant_tests {
    use crate::spatial::math::{
        flat_projection, octant_direction, octant_index, offset_region, vector::V3c,
    };
    use std::collections::HashSet;

    #[test]
    fn test_octant_index_bits() {
        assert_eq!(0, octant_index(&V3c::new(-1., -1., -1.)));
        assert_eq!(1, octant_index(&V3c::new(1., -1., -1.)));
        assert_eq!(2, octant_index(&V3c::new(-1., 1., -1.)));
        assert_eq!(4, octant_index(&V3c::new(-1., -1., 1.)));
        assert_eq!(6, octant_index(&V3c::new(-5., 0.5, 100.)));
        assert_eq!(7, octant_index(&V3c::new(0.1, 0.1, 0.1)));
    }

    #[test]
    fn test_octant_index_zero_counts_as_positive() {
        assert_eq!(7, octant_index(&V3c::new(0., 0., 0.)));
        assert_eq!(7, octant_index(&V3c::new(-0., -0., -0.)));
        assert_eq!(3, octant_index(&V3c::new(0., 0., -0.5)));
    }

    #[test]
    fn test_octant_direction_inverts_index() {
        for octant in 0..8 {
            let direction = octant_direction(octant);
            assert_eq!(
                octant,
                octant_index(&direction),
                "direction {direction:?} should point back into octant {octant}"
            );
            assert_eq!(1., direction.x.abs());
            assert_eq!(1., direction.y.abs());
            assert_eq!(1., direction.z.abs());
        }
    }

    #[test]
    fn test_offset_region() {
        assert!(offset_region(0) == V3c::new(0., 0., 0.));
        assert!(offset_region(1) == V3c::new(1., 0., 0.));
        assert!(offset_region(2) == V3c::new(0., 1., 0.));
        assert!(offset_region(5) == V3c::new(1., 0., 1.));
        assert!(offset_region(7) == V3c::new(1., 1., 1.));
    }

    #[test]
    fn test_flat_projection() {
        const DIMENSION: usize = 10;
        assert!(0 == flat_projection(0, 0, 0, DIMENSION));
        assert!(DIMENSION == flat_projection(10, 0, 0, DIMENSION));
        assert!(DIMENSION == flat_projection(0, 1, 0, DIMENSION));
        assert!(DIMENSION * DIMENSION == flat_projection(0, 0, 1, DIMENSION));
        assert!(
            (DIMENSION * DIMENSION * 4) + (DIMENSION * 2) + 3
                == flat_projection(3, 2, 4, DIMENSION)
        );

        let mut number_coverage = HashSet::new();
        for x in 0..DIMENSION {
            for y in 0..DIMENSION {
                for z in 0..DIMENSION {
                    let address = flat_projection(x, y, z, DIMENSION);
                    assert!(!number_coverage.contains(&address));
                    number_coverage.insert(address);
                }
            }
        }
    }
}

#[cfg(test)]
mod vector_tests {
    use crate::spatial::math::vector::V3c;

    #[test]
    fn test_cross_and_dot() {
        let a = V3c::new(1., 0., 0.);
        let b = V3c::new(0., 1., 0.);
        assert!(V3c::new(0., 0., 1.) == a.cross(b));
        assert_eq!(0., a.dot(&b));
    }

    #[test]
    fn test_recip_and_elements() {
        let v = V3c::new(2., -4., 0.5);
        assert!(V3c::new(0.5, -0.25, 2.) == v.recip());
        assert_eq!(-4., v.min_element());
        assert_eq!(2., v.max_element());
        assert!(V3c::new(1., -1., 1.) == v.signum());
        assert!(V3c::new(-2., 4., -0.5) == -v);
    }
}
