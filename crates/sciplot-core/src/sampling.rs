//! Deterministic random sampling for scatter strips
//!
//! Large samples are thinned before their points are drawn, and strip
//! points are jittered so they do not overlap. Both use a seeded generator
//! so the same data always yields the same figure.

/// Seeded pseudo-random generator (LCG step, splitmix output)
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E3779B97F4A7C15),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        // Top 53 bits give every representable step below 1
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`; `n` must be positive
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    /// Standard normal draw (Box-Muller)
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-10);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// At most `max` values drawn without replacement
///
/// Samples already within the limit are returned unchanged and in order.
pub fn subsample(data: &[f64], max: usize, rng: &mut SeededRng) -> Vec<f64> {
    subsample_indices(data.len(), max, rng)
        .into_iter()
        .map(|i| data[i])
        .collect()
}

/// At most `max` distinct indices below `len`, in ascending order
pub fn subsample_indices(len: usize, max: usize, rng: &mut SeededRng) -> Vec<usize> {
    if len <= max {
        return (0..len).collect();
    }
    // Partial Fisher-Yates over the index list
    let mut indices: Vec<usize> = (0..len).collect();
    for i in 0..max {
        let j = i + rng.below(len - i);
        indices.swap(i, j);
    }
    indices.truncate(max);
    indices.sort_unstable();
    indices
}

/// `center + scale·N(0, 1)` for each of `n` points
pub fn gaussian_jitter(n: usize, center: f64, scale: f64, rng: &mut SeededRng) -> Vec<f64> {
    (0..n).map(|_| center + scale * rng.next_gaussian()).collect()
}

/// Marker size for a scatter of `n` points; denser plots get smaller dots
pub fn marker_size_for(n: usize) -> f64 {
    match n {
        n if n > 5000 => 1.0,
        n if n > 2000 => 2.0,
        n if n > 1000 => 3.0,
        n if n > 200 => 4.0,
        n if n > 80 => 5.0,
        n if n > 25 => 7.0,
        _ => 9.0,
    }
}
