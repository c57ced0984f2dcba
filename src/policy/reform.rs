//! Threshold reform requests and their validated form

use crate::firms::sector::is_known_division;
use crate::firms::Sector;
use crate::{PolicyError, Pounds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest registration threshold a reform may propose (£)
pub const MAX_THRESHOLD: i64 = 500_000;

/// Shape of the phase-in region around the threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaperKind {
    #[default]
    None,
    Moderate,
    Aggressive,
    Custom,
}

/// A reform as submitted by a caller, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRequest {
    /// Turnover (£) at or above which full liability applies
    pub registration_threshold: i64,

    #[serde(default)]
    pub taper_type: TaperKind,

    /// Required for a custom taper
    #[serde(default)]
    pub taper_start: Option<i64>,

    /// Required for a custom taper
    #[serde(default)]
    pub taper_end: Option<i64>,

    /// Accepted and echoed back; the liability formula does not use it
    #[serde(default)]
    pub taper_rate: Option<f64>,

    /// Statutory rate overrides by SIC division for the reform scenario
    #[serde(default)]
    pub sector_rates: BTreeMap<u8, f64>,
}

impl PolicyRequest {
    /// A plain threshold change with no taper
    pub fn threshold_only(threshold: i64) -> Self {
        Self {
            registration_threshold: threshold,
            taper_type: TaperKind::None,
            taper_start: None,
            taper_end: None,
            taper_rate: None,
            sector_rates: BTreeMap::new(),
        }
    }

    /// A custom linear taper between `start` and `end`
    pub fn custom_taper(threshold: i64, start: i64, end: i64) -> Self {
        Self {
            taper_type: TaperKind::Custom,
            taper_start: Some(start),
            taper_end: Some(end),
            ..Self::threshold_only(threshold)
        }
    }

    /// Check the request against the policy contract and derive the
    /// concrete taper bounds
    pub fn validate(&self) -> Result<ResolvedPolicy, PolicyError> {
        let threshold = self.registration_threshold;
        if !(0..=MAX_THRESHOLD).contains(&threshold) {
            return Err(PolicyError::ThresholdOutOfRange(threshold));
        }
        let t = threshold as f64;

        let schedule = match self.taper_type {
            TaperKind::None => TaperSchedule::Step { threshold: Pounds(t) },
            TaperKind::Moderate => TaperSchedule::Linear {
                start: Pounds((t - 25_000.0).max(65_000.0)),
                end: Pounds(t + 20_000.0),
            },
            TaperKind::Aggressive => TaperSchedule::Linear {
                start: Pounds((t - 35_000.0).max(50_000.0)),
                end: Pounds(t + 10_000.0),
            },
            TaperKind::Custom => {
                let (start, end) = match (self.taper_start, self.taper_end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => return Err(PolicyError::MissingTaperBounds),
                };
                if start >= end {
                    return Err(PolicyError::InvertedTaper { start, end });
                }
                TaperSchedule::Linear {
                    start: Pounds(start as f64),
                    end: Pounds(end as f64),
                }
            }
        };

        for (&sector, &rate) in &self.sector_rates {
            if !is_known_division(sector) {
                return Err(PolicyError::InvalidSector(sector));
            }
            if !(0.0..=1.0).contains(&rate) {
                return Err(PolicyError::SectorRateOutOfRange { sector, rate });
            }
        }

        Ok(ResolvedPolicy {
            threshold: Pounds(t),
            taper_kind: self.taper_type,
            schedule,
            taper_rate: self.taper_rate,
            sector_rates: self.sector_rates.clone(),
        })
    }
}

/// Concrete liability schedule after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaperSchedule {
    /// Full liability at or above the threshold, nothing below
    Step { threshold: Pounds },
    /// Liability ramps linearly from 0 at `start` to full at `end`
    Linear { start: Pounds, end: Pounds },
}

impl TaperSchedule {
    /// Share of full liability owed at the given turnover, in [0, 1]
    pub fn multiplier(&self, turnover: Pounds) -> f64 {
        match *self {
            TaperSchedule::Step { threshold } => {
                if turnover >= threshold {
                    1.0
                } else {
                    0.0
                }
            }
            // Derived bounds invert at low thresholds (end < start); the
            // schedule then degrades to a step at `end`
            TaperSchedule::Linear { start, end } => {
                if turnover >= end {
                    1.0
                } else if turnover <= start {
                    0.0
                } else {
                    (turnover.value() - start.value()) / (end.value() - start.value())
                }
            }
        }
    }

    /// Taper bounds, if the schedule has any
    pub fn bounds(&self) -> Option<(Pounds, Pounds)> {
        match *self {
            TaperSchedule::Step { .. } => None,
            TaperSchedule::Linear { start, end } => Some((start, end)),
        }
    }
}

/// A validated reform, safe to hand to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPolicy {
    pub threshold: Pounds,
    pub taper_kind: TaperKind,
    pub schedule: TaperSchedule,
    pub taper_rate: Option<f64>,
    pub sector_rates: BTreeMap<u8, f64>,
}

impl ResolvedPolicy {
    /// Unreformed rules: hard step at `threshold`, standard rate everywhere
    pub fn baseline(threshold: Pounds) -> Self {
        Self {
            threshold,
            taper_kind: TaperKind::None,
            schedule: TaperSchedule::Step { threshold },
            taper_rate: None,
            sector_rates: BTreeMap::new(),
        }
    }

    /// Statutory rate that applies to a firm in `sector`
    pub fn rate_for(&self, sector: Sector, standard_rate: f64) -> f64 {
        sector
            .division()
            .and_then(|d| self.sector_rates.get(&d).copied())
            .unwrap_or(standard_rate)
    }
}
