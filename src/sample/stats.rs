/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Aggregate statistics over RR-set draws.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Running totals over a sequence of draws.
///
/// A pure fold of per-draw (size, width) pairs: merging two accumulators is
/// a componentwise sum, so parallel workers can keep local statistics and
/// combine them in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// The number of completed draws.
    pub draws: u64,
    /// The sum of the sizes of the drawn RR sets.
    pub total_size: u64,
    /// The sum of the widths of the drawn RR sets.
    pub total_width: u64,
}

impl SampleStats {
    /// Folds one draw into the totals.
    #[inline(always)]
    pub fn update(&mut self, size: u64, width: u64) {
        self.draws += 1;
        self.total_size += size;
        self.total_width += width;
    }

    /// Returns the average RR-set size, or zero if there were no draws.
    pub fn avg_size(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.total_size as f64 / self.draws as f64
        }
    }

    /// Returns the average RR-set width, or zero if there were no draws.
    pub fn avg_width(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.total_width as f64 / self.draws as f64
        }
    }
}

impl Add for SampleStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            draws: self.draws + rhs.draws,
            total_size: self.total_size + rhs.total_size,
            total_width: self.total_width + rhs.total_width,
        }
    }
}

impl AddAssign for SampleStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for SampleStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::add)
    }
}

/// Statistics of a completed run, with timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleReport {
    /// The aggregate statistics of the run.
    pub stats: SampleStats,
    /// The wall-clock time spent drawing.
    pub elapsed: Duration,
}

impl SampleReport {
    pub fn new(stats: SampleStats, elapsed: Duration) -> Self {
        Self { stats, elapsed }
    }

    /// Returns the number of draws per second, or zero for an instantaneous
    /// run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.stats.draws as f64 / secs
        }
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "draws: {}; total size: {}; avg size: {:.4}; total width: {}; avg width: {:.4}; elapsed: {:.3}s; draws/s: {:.0}",
            self.stats.draws,
            self.stats.total_size,
            self.stats.avg_size(),
            self.stats.total_width,
            self.stats.avg_width(),
            self.elapsed.as_secs_f64(),
            self.throughput(),
        )
    }
}
