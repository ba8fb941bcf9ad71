//! Seedable randomness for the demo data generators.

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[low, low + span)`, the `floor(r * span) + low`
    /// idiom used for the demo statistics.
    fn next_in(&mut self, low: u32, span: u32) -> u32 {
        let offset = (self.next_f64() * span as f64).floor() as u32;
        low + offset.min(span.saturating_sub(1))
    }

    /// Uniform float in `[low, low + span)`.
    fn next_range(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }
}

/// 64-bit linear congruential generator (Knuth MMIX constants).
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        let mut rng = Lcg { state: seed };
        // Decorrelate small neighbouring seeds
        rng.step();
        rng
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits give an exactly representable fraction below 1.0
        (self.step() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of samples, cycling. Handy for pinning exact values.
#[derive(Debug, Clone)]
pub struct Sequence {
    values: Vec<f64>,
    pos: usize,
}

impl Sequence {
    pub fn new(values: Vec<f64>) -> Self {
        Sequence { values, pos: 0 }
    }
}

impl RandomSource for Sequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
