// Draft scoring configuration: position multipliers, ideal roster depth,
// sub-score weights and the pick value curve.
//
// Every grading call receives a `&ScoringConfig`; nothing here is global.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::pick::Position;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("invalid scoring value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },

    #[error("pick windows out of order: early_cutoff {early_cutoff}, bench {bench_start}..={bench_end}")]
    WindowOrder {
        early_cutoff: u32,
        bench_start: u32,
        bench_end: u32,
    },
}

// ---------------------------------------------------------------------------
// Per-position tables
// ---------------------------------------------------------------------------

/// One value per scored position. Field names match the position codes used
/// in TOML overrides (QB, RB, ...). Keys left out of an override keep the
/// table's default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct PositionValues<T> {
    pub QB: T,
    pub RB: T,
    pub WR: T,
    pub TE: T,
    pub K: T,
    pub DEF: T,
}

impl<T: Copy> PositionValues<T> {
    pub fn get(&self, position: Position) -> T {
        match position {
            Position::Quarterback => self.QB,
            Position::RunningBack => self.RB,
            Position::WideReceiver => self.WR,
            Position::TightEnd => self.TE,
            Position::Kicker => self.K,
            Position::Defense => self.DEF,
        }
    }
}

/// Multipliers: scarce positions are worth more per pick.
impl Default for PositionValues<f64> {
    fn default() -> Self {
        Self {
            QB: 1.10,
            RB: 1.25,
            WR: 1.15,
            TE: 1.05,
            K: 0.50,
            DEF: 0.60,
        }
    }
}

/// Ideal number of drafted players per position.
impl Default for PositionValues<u32> {
    fn default() -> Self {
        Self {
            QB: 2,
            RB: 5,
            WR: 5,
            TE: 2,
            K: 1,
            DEF: 1,
        }
    }
}

/// Weights applied to the four sub-scores when forming the raw total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub top_heavy: f64,
    pub balance: f64,
    pub depth: f64,
    pub volatility: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            top_heavy: 0.45,
            balance: 0.25,
            depth: 0.20,
            volatility: 0.10,
        }
    }
}

/// Diminishing value of a selection by overall pick number:
/// `scale / sqrt(pick + offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundValueCurve {
    pub scale: f64,
    pub offset: f64,
}

impl RoundValueCurve {
    pub fn value(&self, pick_no: u32) -> f64 {
        self.scale / (f64::from(pick_no) + self.offset).sqrt()
    }
}

impl Default for RoundValueCurve {
    fn default() -> Self {
        Self {
            scale: 100.0,
            offset: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub multipliers: PositionValues<f64>,
    pub ideal_depth: PositionValues<u32>,
    pub weights: ScoreWeights,
    pub curve: RoundValueCurve,
    /// Picks at or before this overall number count as early.
    pub early_cutoff: u32,
    /// Bench window is `(bench_start, bench_end]`.
    pub bench_start: u32,
    /// Picks after this overall number count as late.
    pub bench_end: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            multipliers: PositionValues::default(),
            ideal_depth: PositionValues::default(),
            weights: ScoreWeights::default(),
            curve: RoundValueCurve::default(),
            early_cutoff: 36,
            bench_start: 72,
            bench_end: 168,
        }
    }
}

impl ScoringConfig {
    /// Multiplier for a pick's position; unknown positions are neutral.
    pub fn multiplier(&self, position: Option<Position>) -> f64 {
        position.map_or(1.0, |p| self.multipliers.get(p))
    }

    /// Reject configurations that would make grading meaningless or divide
    /// by zero.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let w = &self.weights;
        let weight_fields: &[(&str, f64)] = &[
            ("weights.top_heavy", w.top_heavy),
            ("weights.balance", w.balance),
            ("weights.depth", w.depth),
            ("weights.volatility", w.volatility),
        ];
        for (name, val) in weight_fields {
            if !val.is_finite() || *val < 0.0 {
                return Err(ScoringError::InvalidValue {
                    field: name.to_string(),
                    message: format!("must be finite and >= 0, got {val}"),
                });
            }
        }

        for pos in Position::ALL {
            let m = self.multipliers.get(pos);
            if !m.is_finite() || m <= 0.0 {
                return Err(ScoringError::InvalidValue {
                    field: format!("multipliers.{}", pos.code()),
                    message: format!("must be finite and > 0, got {m}"),
                });
            }
        }

        if !self.curve.scale.is_finite() || self.curve.scale <= 0.0 {
            return Err(ScoringError::InvalidValue {
                field: "curve.scale".into(),
                message: format!("must be > 0, got {}", self.curve.scale),
            });
        }
        if !self.curve.offset.is_finite() || self.curve.offset < 0.0 {
            return Err(ScoringError::InvalidValue {
                field: "curve.offset".into(),
                message: format!("must be >= 0, got {}", self.curve.offset),
            });
        }

        if self.early_cutoff > self.bench_start || self.bench_start >= self.bench_end {
            return Err(ScoringError::WindowOrder {
                early_cutoff: self.early_cutoff,
                bench_start: self.bench_start,
                bench_end: self.bench_end,
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
