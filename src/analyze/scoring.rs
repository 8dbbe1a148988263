//! Score aggregation: `clamp(base + Σ deltas, 0, 100)`.
//!
//! Summation happens in `i64`, so any configured point values add up
//! without overflow and in any order. Clamping is the only nonlinearity.

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

/// Clamp a raw total into the score range.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

/// Final score from a base and rule deltas.
pub fn aggregate<I>(base: i32, deltas: I) -> u8
where
    I: IntoIterator<Item = i32>,
{
    let total = deltas
        .into_iter()
        .fold(base as i64, |acc, d| acc + d as i64);
    clamp_score(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_onto_base() {
        assert_eq!(aggregate(50, [15, 10]), 75);
        assert_eq!(aggregate(50, Vec::<i32>::new()), 50);
    }

    #[test]
    fn clamps_both_ends() {
        assert_eq!(aggregate(50, [-40, -40]), 0);
        assert_eq!(aggregate(50, [30, 30, 30]), 100);
        assert_eq!(aggregate(i32::MAX, [i32::MAX]), 100);
        assert_eq!(aggregate(i32::MIN, [i32::MIN]), 0);
    }

    #[test]
    fn clamp_is_idempotent() {
        for raw in [-500i64, -1, 0, 42, 100, 101, 9_999] {
            let once = clamp_score(raw);
            assert_eq!(clamp_score(once as i64), once);
        }
    }

    #[test]
    fn order_does_not_matter() {
        let deltas = [15, -10, 10, 5, -10, 5];
        let mut reversed = deltas;
        reversed.reverse();
        assert_eq!(aggregate(50, deltas), aggregate(50, reversed));
    }
}
