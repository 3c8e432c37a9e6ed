use crate::iupac_code::IupacCode;
use serde::{Deserialize, Serialize};

#[inline(always)]
pub fn gc_count(sequence: &[u8]) -> usize {
    sequence.iter().filter(|&&c| IupacCode::is_gc(c)).count()
}

/// Fraction of G/C over all characters, 0 for an empty slice.
#[inline(always)]
pub fn gc_fraction(sequence: &[u8]) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    gc_count(sequence) as f64 / sequence.len() as f64
}

/// Inclusive GC fraction interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GcBand {
    pub min: f64,
    pub max: f64,
}

impl GcBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn contains(&self, gc: f64) -> bool {
        gc >= self.min && gc <= self.max
    }

    /// Distance to the nearest edge, 0 inside the band.
    #[inline(always)]
    pub fn distance(&self, gc: f64) -> f64 {
        if gc < self.min {
            self.min - gc
        } else if gc > self.max {
            gc - self.max
        } else {
            0.0
        }
    }
}

impl Default for GcBand {
    fn default() -> Self {
        Self::new(0.40, 0.60)
    }
}
