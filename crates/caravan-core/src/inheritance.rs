//! Size inheritance between parents and offspring

use crate::rng::TraitRng;

/// Size of a creature that was never tagged
pub const DEFAULT_SIZE: f64 = 1.0;

/// Interpolate a child size between the two parent sizes
///
/// Draws one uniform value `u` and returns `lo + u * (hi - lo)`. The result
/// always lies in `[min(a, b), max(a, b)]`.
pub fn interpolate_size<R: TraitRng + ?Sized>(size_a: f64, size_b: f64, rng: &mut R) -> f64 {
    let lo = size_a.min(size_b);
    let hi = size_a.max(size_b);
    let draw = rng.next_unit();
    (lo + draw * (hi - lo)).max(lo).min(hi)
}
