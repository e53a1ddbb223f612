//! HyperLogLog distinct-count estimator over `i32` values.
//!
//! Shares only the integer hash with the tables. The top `b` bits of
//! `hash_int(x)` pick a register; the register keeps the largest rank seen,
//! where rank is the number of leading zeros in the remaining `32 - b` bits
//! plus one.

use crate::strategy::hash_int;

/// 2^12 = 4096 registers.
pub const DEFAULT_BUCKET_BITS: u32 = 12;

const HASH_BITS: u32 = u32::BITS;

#[derive(Clone, Debug)]
pub struct HyperLogLog {
    bucket_bits: u32,
    registers: Vec<u8>,
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_BITS)
    }
}

impl HyperLogLog {
    /// `bucket_bits` must be in `4..=16`.
    pub fn new(bucket_bits: u32) -> Self {
        assert!(
            (4..=16).contains(&bucket_bits),
            "bucket_bits must be between 4 and 16, got {bucket_bits}"
        );
        Self {
            bucket_bits,
            registers: vec![0; 1 << bucket_bits],
        }
    }

    pub fn registers(&self) -> usize {
        self.registers.len()
    }

    pub fn insert(&mut self, value: i32) {
        let hash = hash_int(value);
        let bucket = (hash >> (HASH_BITS - self.bucket_bits)) as usize;
        let rest_bits = HASH_BITS - self.bucket_bits;
        let rest = hash & ((1u32 << rest_bits) - 1);
        // Zeros in the low `rest_bits` bits, counted from their top.
        let rank = (rest.leading_zeros() - self.bucket_bits + 1) as u8;
        let reg = &mut self.registers[bucket];
        if rank > *reg {
            *reg = rank;
        }
    }

    /// Raw estimate with linear counting below `2.5 * m`.
    pub fn estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 2f64.powi(-i32::from(r)))
            .sum();
        let raw = alpha * m * m / sum;
        let zeros = self.registers.iter().filter(|&&r| r == 0).count();
        if raw <= 2.5 * m && zeros > 0 {
            m * (m / zeros as f64).ln()
        } else {
            raw
        }
    }

    pub fn merge(&mut self, other: &HyperLogLog) {
        assert_eq!(
            self.bucket_bits, other.bucket_bits,
            "cannot merge estimators with different register counts"
        );
        for (a, &b) in self.registers.iter_mut().zip(&other.registers) {
            *a = (*a).max(b);
        }
    }
}

impl Extend<i32> for HyperLogLog {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        for v in iter {
            self.insert(v);
        }
    }
}
