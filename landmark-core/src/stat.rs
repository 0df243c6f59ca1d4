//! Running statistics of scalar values.
use crate::error::LandmarkError;
use anyhow::Result;

/// Accumulates scalar values for average, sum and maximum.
#[derive(Clone, Debug, Default)]
pub struct StatCounter {
    sum: f64,
    count: usize,
    max: Option<f32>,
}

impl StatCounter {
    /// Adds a value.
    pub fn feed(&mut self, v: f32) {
        self.sum += v as f64;
        self.count += 1;
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    /// Returns the average of the fed values.
    pub fn average(&self) -> Result<f32> {
        if self.count == 0 {
            return Err(LandmarkError::EmptyStatistics.into());
        }
        Ok((self.sum / self.count as f64) as f32)
    }

    /// Returns the maximum of the fed values.
    pub fn max(&self) -> Result<f32> {
        self.max.ok_or_else(|| LandmarkError::EmptyStatistics.into())
    }

    /// Returns the sum of the fed values.
    pub fn sum(&self) -> f32 {
        self.sum as f32
    }

    /// Returns the number of fed values.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Clears all values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
