//! Threshold configuration for clustering runs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Resolved threshold plan for a run: the default epsilon plus an optional
/// hierarchical schedule, kept sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Threshold used when no schedule is supplied.
    pub default_eps: f64,

    /// Hierarchical schedule of thresholds, ascending. Empty means a
    /// single run at the default.
    pub schedule: Vec<f64>,
}

impl AnalysisConfig {
    /// A single run at the default threshold.
    pub fn single(default_eps: f64) -> Self {
        Self {
            default_eps,
            schedule: Vec::new(),
        }
    }

    /// Adopt an explicit schedule, sorting it ascending.
    pub fn with_schedule(default_eps: f64, mut schedule: Vec<f64>) -> Self {
        schedule.sort_by(f64::total_cmp);
        Self {
            default_eps,
            schedule,
        }
    }

    /// Read a schedule file: one threshold per line (any whitespace
    /// separation is accepted), sorted ascending before use.
    pub fn from_schedule_file(default_eps: f64, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule file {}", path.display()))?;
        let mut schedule = Vec::new();
        for token in contents.split_whitespace() {
            let eps: f64 = token
                .parse()
                .with_context(|| format!("invalid threshold {:?} in {}", token, path.display()))?;
            schedule.push(eps);
        }
        Ok(Self::with_schedule(default_eps, schedule))
    }

    /// Derive a schedule of roughly `length` entries by sampling every
    /// k-th distinct observed score, capped with a final 1.99 threshold
    /// that keeps every defined score in agreement.
    pub fn auto_schedule(default_eps: f64, distribution: &[(f64, u64)], length: usize) -> Self {
        let mut schedule = Vec::new();
        if length > 0 && !distribution.is_empty() {
            let step = (distribution.len() / length).max(1);
            for (position, &(score, _)) in distribution.iter().enumerate() {
                if position % step == 0 {
                    schedule.push(score);
                }
            }
            schedule.push(1.99);
        }
        Self::with_schedule(default_eps, schedule)
    }

    /// The thresholds to run, in order: the schedule when one is present,
    /// otherwise just the default.
    pub fn thresholds(&self) -> Vec<f64> {
        if self.schedule.is_empty() {
            vec![self.default_eps]
        } else {
            self.schedule.clone()
        }
    }
}
