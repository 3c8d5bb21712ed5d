//! RNG trait abstraction for trait inheritance
//!
//! Allows breeding to work with both:
//! - a seeded generator (tests, scenario replays)
//! - the thread RNG or any other `rand::Rng`

/// Uniform random source used by breeding
pub trait TraitRng {
    /// Generate random f64 in [0.0, 1.0)
    fn next_unit(&mut self) -> f64;
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> TraitRng for T {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::random(self)
    }
}

/// Replays a fixed list of draws, cycling when exhausted
///
/// Lets tests pin breeding to exact points of the interpolation range.
#[derive(Debug, Clone)]
pub struct FixedDraws {
    draws: Vec<f64>,
    next: usize,
}

impl FixedDraws {
    /// Draws outside [0, 1) are clamped into it
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let draws: Vec<f64> = draws
            .into_iter()
            .map(|draw| draw.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { draws, next: 0 }
    }
}

impl TraitRng for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}
