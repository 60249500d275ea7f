#[cfg(test)]
mod node_tests {
    use crate::spatial::{math::vector::V3c, Node};

    #[test]
    fn test_child_bounds() {
        let node = Node::new(V3c::unit(0.), 512.);

        let child = node.child(0);
        assert!(child.center == V3c::unit(-128.));
        assert!(child.size == 256.);

        let child = node.child(1);
        assert!(child.center == V3c::new(128., -128., -128.));

        let child = node.child(2);
        assert!(child.center == V3c::new(-128., 128., -128.));

        let child = node.child(4);
        assert!(child.center == V3c::new(-128., -128., 128.));

        let child = node.child(7);
        assert!(child.center == V3c::unit(128.));
        assert!(child.child(0).center == V3c::unit(64.));
        assert!(child.child(0).size == 128.);
    }

    #[test]
    fn test_children_tile_the_parent() {
        let node = Node::new(V3c::new(10., -3., 7.), 8.);
        let mut volume = 0.;
        for octant in 0..8 {
            let child = node.child(octant);
            volume += child.size * child.size * child.size;
            assert!(node.contains_point(&child.center));
            assert!(node.contains_point(&child.min_position()));
        }
        assert_eq!(node.size * node.size * node.size, volume);
    }

    #[test]
    fn test_contains_point_edges() {
        let node = Node::new(V3c::unit(2.), 4.);
        assert!(node.min_position() == V3c::unit(0.));
        assert!(node.max_position() == V3c::unit(4.));
        assert!(node.contains_point(&V3c::new(0., 0., 0.)));
        assert!(node.contains_point(&V3c::new(3.99, 2., 1.)));
        assert!(!node.contains_point(&V3c::new(4.1, 2., 1.)));
        assert!(!node.contains_point(&V3c::new(2., -0.1, 1.)));
    }
}
