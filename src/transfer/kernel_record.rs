//! Framing for filter kernels.

use super::TransferError;
use crate::kernel::{FilterKernel, KernelBank};

/// Maximum number of weights one kernel record can carry.
pub const KERNEL_CAPACITY: usize = 256;

/// A kernel as it crosses the engine boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelRecord {
    pub width: u32,
    pub height: u32,
    pub mult: f32,
    pub invert: bool,
    /// Row-major weights, at most [`KERNEL_CAPACITY`] entries
    pub weights: Vec<f32>,
}

impl KernelRecord {
    pub fn from_kernel(kernel: &FilterKernel) -> Result<Self, TransferError> {
        let weights = kernel.serialize();
        if weights.len() > KERNEL_CAPACITY {
            return Err(TransferError::KernelTooLarge {
                name: kernel.name.to_string(),
                weights: weights.len(),
                capacity: KERNEL_CAPACITY,
            });
        }
        if weights.len() != (kernel.width * kernel.height) as usize {
            return Err(TransferError::KernelShape {
                name: kernel.name.to_string(),
                width: kernel.width,
                height: kernel.height,
                weights: weights.len(),
            });
        }
        Ok(Self {
            width: kernel.width,
            height: kernel.height,
            mult: kernel.mult,
            invert: kernel.invert,
            weights,
        })
    }

    /// Weight at column `x`, row `y`. Positions without a stored weight
    /// read as zero.
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        if x >= self.width {
            return 0.0;
        }
        self.weights
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Check a record built by hand against the same rules
    /// [`from_kernel`](Self::from_kernel) applies.
    pub fn validate(&self, name: &str) -> Result<(), TransferError> {
        if self.weights.len() > KERNEL_CAPACITY {
            return Err(TransferError::KernelTooLarge {
                name: name.to_string(),
                weights: self.weights.len(),
                capacity: KERNEL_CAPACITY,
            });
        }
        if self.weights.len() != self.width as usize * self.height as usize {
            return Err(TransferError::KernelShape {
                name: name.to_string(),
                width: self.width,
                height: self.height,
                weights: self.weights.len(),
            });
        }
        Ok(())
    }
}

/// Frame every kernel of the bank, preserving bank order.
pub fn encode_kernels(bank: &KernelBank) -> Result<Vec<KernelRecord>, TransferError> {
    bank.iter().map(KernelRecord::from_kernel).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{EDGE_DETECT, SHARPEN};

    #[test]
    fn test_encode_standard_bank() {
        let records = encode_kernels(KernelBank::standard()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].mult, 50.0);
        assert_eq!(records[1].weights, SHARPEN.serialize());
        assert_eq!(records[2].weight(1, 1), 8.0);
        assert_eq!(records[2], KernelRecord::from_kernel(&EDGE_DETECT).unwrap());
    }

    #[test]
    fn test_oversized_kernel_rejected() {
        static HUGE_WEIGHTS: [f32; 17 * 17] = [0.0; 17 * 17];
        let huge = FilterKernel {
            name: "huge",
            width: 17,
            height: 17,
            weights: &HUGE_WEIGHTS,
            mult: 1.0,
            invert: false,
        };
        assert!(matches!(
            KernelRecord::from_kernel(&huge),
            Err(TransferError::KernelTooLarge { weights: 289, .. })
        ));
    }

    #[test]
    fn test_misshapen_kernel_rejected() {
        let bad = FilterKernel {
            name: "bad",
            width: 3,
            height: 3,
            weights: &[1.0, 2.0],
            mult: 1.0,
            invert: false,
        };
        assert!(matches!(
            KernelRecord::from_kernel(&bad),
            Err(TransferError::KernelShape { .. })
        ));
    }

    #[test]
    fn test_hand_built_record_is_checked() {
        let record = KernelRecord {
            width: 3,
            height: 3,
            mult: 1.0,
            invert: false,
            weights: vec![1.0, 2.0],
        };
        assert_eq!(record.weight(1, 0), 2.0);
        assert_eq!(record.weight(2, 2), 0.0);
        assert_eq!(record.weight(5, 0), 0.0);
        assert!(matches!(
            record.validate("short"),
            Err(TransferError::KernelShape { weights: 2, .. })
        ));
        let good = KernelRecord::from_kernel(&SHARPEN).unwrap();
        assert!(good.validate("sharpen").is_ok());
    }
}
