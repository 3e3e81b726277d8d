//! Injectable noise for ensemble scoring.
//!
//! Each member score is perturbed by `amplitude * draw()` where `draw()` is
//! uniform on [0, 1). Production scoring uses the thread RNG, so repeated
//! calls on the same URL can differ slightly. Seeded and constant sources
//! make scoring reproducible.

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in [0, 1).
pub trait NoiseSource {
    fn draw(&mut self) -> f64;
}

/// Noise backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngNoise<R> {
    rng: R,
}

impl<R: Rng> RngNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNoise<ThreadRng> {
    /// Non-deterministic noise from the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl Default for RngNoise<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl RngNoise<ChaCha8Rng> {
    /// Reproducible noise: the same seed yields the same draw sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for RngNoise<R> {
    fn draw(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Pins every draw to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn draw(&mut self) -> f64 {
        0.0
    }
}

/// Returns the same value on every draw, clamped into [0, 1).
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn draw(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_noise_in_unit_interval() {
        let mut noise = RngNoise::thread();
        for _ in 0..1000 {
            let d = noise.draw();
            assert!((0.0..1.0).contains(&d), "draw {} out of range", d);
        }
    }

    #[test]
    fn test_seeded_noise_reproducible() {
        let mut a = RngNoise::seeded(42);
        let mut b = RngNoise::seeded(42);
        let xs: Vec<f64> = (0..16).map(|_| a.draw()).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.draw()).collect();
        assert_eq!(xs, ys);

        let mut c = RngNoise::seeded(43);
        let zs: Vec<f64> = (0..16).map(|_| c.draw()).collect();
        assert_ne!(xs, zs);
    }

    #[test]
    fn test_constant_sources() {
        assert_eq!(NoNoise.draw(), 0.0);
        assert_eq!(FixedNoise(0.5).draw(), 0.5);
        assert!(FixedNoise(3.0).draw() < 1.0);
        assert_eq!(FixedNoise(-1.0).draw(), 0.0);
    }

    #[test]
    fn test_boxed_source() {
        let mut boxed: Box<dyn NoiseSource> = Box::new(FixedNoise(0.25));
        assert_eq!(boxed.draw(), 0.25);
    }
}
