//! Sampling helpers over the injected entropy source.

use axobase_core::ports::EntropySource;
use std::f64::consts::PI;

/// Draw from `N(0, sigma)` via Box-Muller. Consumes two uniform draws, so
/// sequences stay reproducible under a seeded source.
pub fn gaussian(rng: &mut dyn EntropySource, sigma: f64) -> f64 {
    let u1 = rng.next_f64().max(f64::MIN_POSITIVE);
    let u2 = rng.next_f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * sigma
}

/// Hex-encode `n` bytes from the source, for minting gene ids.
pub fn hex_token(rng: &mut dyn EntropySource, n: usize) -> String {
    rng.next_bytes(n).iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axobase_core::ports::ChaChaEntropy;

    #[test]
    fn gaussian_is_reproducible() {
        let mut a = ChaChaEntropy::seeded(9);
        let mut b = ChaChaEntropy::seeded(9);
        for _ in 0..50 {
            assert_eq!(gaussian(&mut a, 0.1), gaussian(&mut b, 0.1));
        }
    }

    #[test]
    fn gaussian_is_roughly_centered() {
        let mut rng = ChaChaEntropy::seeded(1);
        let samples: Vec<f64> = (0..5000).map(|_| gaussian(&mut rng, 1.0)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1, "mean {mean} too far from 0");
        let within_two_sigma = samples.iter().filter(|x| x.abs() < 2.0).count();
        assert!(within_two_sigma as f64 / samples.len() as f64 > 0.9);
    }

    #[test]
    fn hex_token_has_requested_length() {
        let mut rng = ChaChaEntropy::seeded(2);
        assert_eq!(hex_token(&mut rng, 4).len(), 8);
    }
}
