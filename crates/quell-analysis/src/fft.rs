//! FFT wrapper with windowing functions.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
}

impl Window {
    /// Apply window to a buffer.
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos());
                    *sample *= w;
                }
            }
            Window::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.54 - 0.46 * (2.0 * PI * i as f32 / n as f32).cos();
                    *sample *= w;
                }
            }
            Window::Blackman => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / n as f32;
                    let w = 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients.
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// FFT processor with cached plans for one transform size.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    ifft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input.
    ///
    /// Returns complex spectrum (size/2 + 1 bins for positive frequencies).
    /// Input shorter than the FFT size is zero-padded.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> =
            input.iter().map(|&x| Complex::new(x, 0.0)).collect();

        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        // Only positive frequencies (DC to Nyquist)
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Perform inverse FFT on a full complex buffer (in-place), normalized
    /// by 1/size.
    pub fn inverse_complex(&self, buffer: &mut [Complex<f32>]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_hann() {
        let mut buffer = vec![1.0; 100];
        Window::Hann.apply(&mut buffer);

        // Hann window should be 0 at edges, 1 at center
        assert!(buffer[0] < 0.01);
        assert!((buffer[50] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_window_hamming_endpoints() {
        let coeffs = Window::Hamming.coefficients(101);
        assert!((coeffs[0] - 0.08).abs() < 0.01);
        assert!((coeffs[50] - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(256);

        let input = vec![1.0; 256];
        let spectrum = fft.forward(&input);

        // DC bin should dominate
        let dc_mag = spectrum[0].norm();
        let other_mag: f32 = spectrum[1..].iter().map(|c| c.norm()).sum();

        assert!(dc_mag > other_mag * 10.0);
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let fft = Fft::new(64);
        let input: Vec<f32> = (0..64)
            .map(|i| (2.0 * PI * 5.0 * i as f32 / 64.0).sin())
            .collect();

        let mut buffer: Vec<Complex<f32>> =
            input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.fft.process(&mut buffer);
        fft.inverse_complex(&mut buffer);

        for (a, b) in input.iter().zip(buffer.iter()) {
            assert!((a - b.re).abs() < 1e-4, "mismatch: {} vs {}", a, b.re);
        }
    }
}
