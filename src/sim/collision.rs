//! Collision detection
//!
//! Everything in the game is an axis-aligned box. The lightning is tested
//! against a small square at the hero's centre instead of the whole sprite,
//! so grazing the edges of the artwork is survivable.

use super::rect::Rect;

/// Strict AABB overlap; rectangles that only share an edge do not overlap
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Square hit-zone of half-extent `radius` centred on `bounds`
#[inline]
pub fn hit_zone(bounds: &Rect, radius: f32) -> Rect {
    Rect::centered(bounds.center(), radius)
}

/// Entity has moved completely past the top edge of the playfield
#[inline]
pub fn exited_top(bounds: &Rect) -> bool {
    bounds.top() < 0.0
}

/// Entity has moved completely past the bottom edge of the playfield
#[inline]
pub fn exited_bottom(bounds: &Rect, playfield: &Rect) -> bool {
    bounds.top() > playfield.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_overlap_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_disjoint_on_one_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Same rows, different columns
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 10.0, 10.0)));
        // Same columns, different rows
        assert!(!overlaps(&a, &Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_hit_zone_is_centered() {
        let hero = Rect::new(100.0, 400.0, 200.0, 200.0);
        let zone = hit_zone(&hero, 10.0);
        assert_eq!(zone.center(), Vec2::new(200.0, 500.0));
        assert_eq!(zone.size, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_hit_zone_ignores_sprite_edges() {
        let hero = Rect::new(100.0, 400.0, 200.0, 200.0);
        let zone = hit_zone(&hero, 10.0);
        // A bolt clipping the hero's shoulder hits the sprite but not the zone
        let bolt = Rect::new(110.0, 410.0, 32.0, 64.0);
        assert!(overlaps(&bolt, &hero));
        assert!(!overlaps(&bolt, &zone));
        // Straight through the middle
        let bolt = Rect::new(190.0, 450.0, 32.0, 64.0);
        assert!(overlaps(&bolt, &zone));
    }

    #[test]
    fn test_exits() {
        let field = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(exited_top(&Rect::new(0.0, -0.5, 40.0, 100.0)));
        assert!(!exited_top(&Rect::new(0.0, 0.0, 40.0, 100.0)));
        assert!(exited_bottom(&Rect::new(0.0, 600.5, 32.0, 64.0), &field));
        assert!(!exited_bottom(&Rect::new(0.0, 600.0, 32.0, 64.0), &field));
    }
}
