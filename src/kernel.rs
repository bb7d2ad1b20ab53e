//! Filter kernel definitions.
//!
//! The bank is a fixed, ordered list. Its order is significant: it defines
//! the column order of the per-kernel filtered images the engine scores
//! glyphs against.

/// A convolution filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterKernel {
    /// Human-readable name
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Weights in row-major order, `width * height` entries
    pub weights: &'static [f32],
    /// Multiplied into the kernel's output to control brightness
    pub mult: f32,
    /// Invert the output after filtering, so every kernel agrees on a
    /// background color
    pub invert: bool,
}

impl FilterKernel {
    /// Weight at column `x`, row `y`.
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        self.weights[(y * self.width + x) as usize]
    }

    /// Flatten the weight matrix in row-major order.
    pub fn serialize(&self) -> Vec<f32> {
        self.weights.to_vec()
    }
}

/// Passthrough.
pub const IDENTITY: FilterKernel = FilterKernel {
    name: "identity",
    width: 3,
    height: 3,
    weights: &[
        0.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 0.0,
    ],
    mult: 1.0,
    invert: false,
};

pub const SHARPEN: FilterKernel = FilterKernel {
    name: "sharpen",
    width: 3,
    height: 3,
    weights: &[
         0.0, -1.0,  0.0,
        -1.0,  5.0, -1.0,
         0.0, -1.0,  0.0,
    ],
    mult: 1.0,
    invert: false,
};

/// 8-neighbour edge detector.
pub const EDGE_DETECT: FilterKernel = FilterKernel {
    name: "edge-detect",
    width: 3,
    height: 3,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  8.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
    mult: 50.0,
    invert: false,
};

/// Normalized 3x3 Gaussian blur.
pub const GAUSSIAN_BLUR: FilterKernel = FilterKernel {
    name: "gaussian-blur",
    width: 3,
    height: 3,
    weights: &[
        1.0, 2.0, 1.0,
        2.0, 4.0, 2.0,
        1.0, 2.0, 1.0,
    ],
    mult: 1.0 / 16.0,
    invert: false,
};

/// An ordered, immutable list of kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelBank {
    kernels: &'static [FilterKernel],
}

static STANDARD_KERNELS: [FilterKernel; 4] = [IDENTITY, SHARPEN, EDGE_DETECT, GAUSSIAN_BLUR];

/// The process-wide default bank. Plain static data, so it is safe to read
/// from any thread.
pub static STANDARD_BANK: KernelBank = KernelBank {
    kernels: &STANDARD_KERNELS,
};

impl KernelBank {
    /// Build a bank over a static kernel list.
    pub const fn new(kernels: &'static [FilterKernel]) -> Self {
        Self { kernels }
    }

    /// The default bank: identity, sharpen, edge detect, Gaussian blur.
    pub fn standard() -> &'static KernelBank {
        &STANDARD_BANK
    }

    pub fn kernels(&self) -> &'static [FilterKernel] {
        self.kernels
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'static, FilterKernel> {
        self.kernels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_bank_order() {
        let names: Vec<_> = KernelBank::standard().iter().map(|k| k.name).collect();
        assert_eq!(names, ["identity", "sharpen", "edge-detect", "gaussian-blur"]);
    }

    #[test]
    fn test_weights_match_dimensions() {
        for k in KernelBank::standard().iter() {
            assert_eq!(k.weights.len(), (k.width * k.height) as usize, "{}", k.name);
        }
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(IDENTITY.mult, 1.0);
        assert_eq!(EDGE_DETECT.mult, 50.0);
        assert_eq!(GAUSSIAN_BLUR.mult, 0.0625);
        let blur_sum: f32 = GAUSSIAN_BLUR.weights.iter().sum();
        assert_eq!(blur_sum * GAUSSIAN_BLUR.mult, 1.0);
    }

    #[test]
    fn test_serialize_is_row_major() {
        const ASYM: FilterKernel = FilterKernel {
            name: "asym",
            width: 3,
            height: 2,
            weights: &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            mult: 1.0,
            invert: true,
        };
        assert_eq!(ASYM.weight(2, 0), 3.0);
        assert_eq!(ASYM.weight(0, 1), 4.0);
        assert_eq!(ASYM.serialize(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_bank_is_shareable_across_threads() {
        let handle = std::thread::spawn(|| KernelBank::standard().len());
        assert_eq!(handle.join().unwrap(), 4);
    }
}
