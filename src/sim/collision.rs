//! Axis-aligned bounding box collision
//!
//! Coordinates are canvas pixels: origin top-left, y grows downward.
//! Sprites carry a one pixel transparent border, so outer bounds are inset
//! by one pixel before testing.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CollisionBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - amount * 2.0,
            self.height - amount * 2.0,
        )
    }

    /// Translate a box given in local coordinates to the origin of `origin`
    pub fn offset_by(&self, origin: &CollisionBox) -> Self {
        Self::new(self.x + origin.x, self.y + origin.y, self.width, self.height)
    }
}

/// Strict overlap test. Boxes that only share an edge do not collide.
pub fn boxes_overlap(a: &CollisionBox, b: &CollisionBox) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Two-phase collision check.
///
/// First the outer bounds are compared; only if they overlap is every local
/// box of `parts_a` (relative to `outer_a`) tested against every local box of
/// `parts_b` (relative to `outer_b`). Returns the first overlapping pair in
/// world coordinates.
pub fn check_detailed(
    outer_a: &CollisionBox,
    parts_a: &[CollisionBox],
    outer_b: &CollisionBox,
    parts_b: &[CollisionBox],
) -> Option<(CollisionBox, CollisionBox)> {
    if !boxes_overlap(outer_a, outer_b) {
        return None;
    }

    for part_a in parts_a {
        let adj_a = part_a.offset_by(outer_a);
        for part_b in parts_b {
            let adj_b = part_b.offset_by(outer_b);
            if boxes_overlap(&adj_a, &adj_b) {
                return Some((adj_a, adj_b));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
        let b = CollisionBox::new(5.0, 5.0, 10.0, 10.0);
        let c = CollisionBox::new(20.0, 0.0, 5.0, 5.0);
        assert!(boxes_overlap(&a, &b));
        assert!(!boxes_overlap(&a, &c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
        let right = CollisionBox::new(10.0, 0.0, 10.0, 10.0);
        let below = CollisionBox::new(0.0, 10.0, 10.0, 10.0);
        assert!(!boxes_overlap(&a, &right));
        assert!(!boxes_overlap(&a, &below));
    }

    #[test]
    fn test_inset_and_offset() {
        let outer = CollisionBox::new(50.0, 93.0, 44.0, 47.0).inset(1.0);
        assert_eq!(outer, CollisionBox::new(51.0, 94.0, 42.0, 45.0));

        let local = CollisionBox::new(22.0, 0.0, 17.0, 16.0);
        assert_eq!(local.offset_by(&outer), CollisionBox::new(73.0, 94.0, 17.0, 16.0));
    }

    #[test]
    fn test_detailed_check_needs_part_overlap() {
        // Outer bounds overlap in the top-left corner, but the only part of A
        // sits in the top-right, so there is no hit.
        let outer_a = CollisionBox::new(0.0, 0.0, 40.0, 40.0);
        let parts_a = [CollisionBox::new(25.0, 0.0, 15.0, 15.0)];
        let outer_b = CollisionBox::new(-5.0, -5.0, 15.0, 15.0);
        let parts_b = [CollisionBox::new(0.0, 0.0, 15.0, 15.0)];
        assert!(boxes_overlap(&outer_a, &outer_b));
        assert!(check_detailed(&outer_a, &parts_a, &outer_b, &parts_b).is_none());

        // Move B over the part and it hits, reported in world coordinates.
        let outer_b = CollisionBox::new(30.0, 5.0, 15.0, 15.0);
        let (hit_a, hit_b) = check_detailed(&outer_a, &parts_a, &outer_b, &parts_b).unwrap();
        assert_eq!(hit_a, CollisionBox::new(25.0, 0.0, 15.0, 15.0));
        assert_eq!(hit_b, outer_b);
    }

    fn arb_box() -> impl Strategy<Value = CollisionBox> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| CollisionBox::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(boxes_overlap(&a, &b), boxes_overlap(&b, &a));
        }

        #[test]
        fn prop_box_overlaps_itself(a in arb_box()) {
            prop_assert!(boxes_overlap(&a, &a));
        }

        #[test]
        fn prop_separated_on_x_never_overlap(a in arb_box(), gap in 0.0f32..100.0, y in -500.0f32..500.0, w in 0.5f32..50.0, h in 0.5f32..50.0) {
            let b = CollisionBox::new(a.right() + gap, y, w, h);
            prop_assert!(!boxes_overlap(&a, &b));
        }
    }
}
