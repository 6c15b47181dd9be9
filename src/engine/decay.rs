//! The weekly decay model.

/// Expected value of a points balance after one decay pass.
///
/// With `floor > 0` (the GP case) the decay is anchored: only the portion
/// above the floor decays, and the result never drops below it. With
/// `floor == 0` (the EP case) the whole value decays toward zero. The result
/// is floored mathematically (toward negative infinity), not truncated
/// toward zero.
pub fn decay(value: i64, percent: f64, floor: i64) -> i64 {
    if floor > 0 {
        let decayed = (floor as f64 + (value - floor) as f64 * (1.0 - percent)).floor();
        (decayed as i64).max(floor)
    } else {
        let decayed = (value as f64 * (1.0 - percent)).floor();
        (decayed as i64).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanchored_decay() {
        assert_eq!(decay(100, 0.1, 0), 90);
        assert_eq!(decay(59, 0.1, 0), 53);
        assert_eq!(decay(0, 0.1, 0), 0);
    }

    #[test]
    fn test_anchored_decay() {
        // Only the 10 points above the floor decay: 50 + 10 * 0.9 = 59.
        assert_eq!(decay(60, 0.1, 50), 59);
        assert_eq!(decay(50, 0.1, 50), 50);
    }

    #[test]
    fn test_anchored_decay_never_drops_below_floor() {
        assert_eq!(decay(30, 0.1, 50), 50);
    }

    #[test]
    fn test_unanchored_decay_bounded_below_by_zero() {
        for p in [0.0, 0.1, 0.5, 1.0] {
            for v in [0, 1, 7, 100, 12_345] {
                assert!(decay(v, p, 0) >= 0, "decay({v}, {p}, 0) went negative");
            }
        }
    }

    #[test]
    fn test_decay_monotonic_in_value() {
        for p in [0.0, 0.1, 0.25, 1.0] {
            let mut last = decay(0, p, 0);
            for v in 1..=500 {
                let next = decay(v, p, 0);
                assert!(next >= last, "decay not monotonic at v={v}, p={p}");
                last = next;
            }
        }
    }

    #[test]
    fn test_double_decay_never_exceeds_single() {
        for p in [0.05, 0.1, 0.5] {
            for v in [0, 10, 59, 100, 1000] {
                for floor in [0, 50] {
                    let once = decay(v, p, floor);
                    let twice = decay(once, p, floor);
                    assert!(twice <= once, "double decay grew at v={v}, p={p}, floor={floor}");
                }
            }
        }
    }

    #[test]
    fn test_floor_is_mathematical() {
        // 59 * 0.9 = 53.1 floors to 53, not 54.
        assert_eq!(decay(59, 0.1, 0), 53);
        // 50 + 13 * 0.9 = 61.7 floors to 61.
        assert_eq!(decay(63, 0.1, 50), 61);
    }
}
