use serde::Serialize;

use crate::tables::{self, AgeGroup, Leg, Position};

// Keeps odds finite when the sheet reports 100% or more.
const MAX_BASE_PROBABILITY: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Multipliers {
    pub position: f64,
    pub leg: f64,
    pub height: f64,
}

impl Multipliers {
    pub fn product(&self) -> f64 {
        self.position * self.leg * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    /// Base probability actually used, as a fraction after clamping.
    pub base_probability: f64,
    pub multipliers: Multipliers,
    pub final_probability: f64,
}

pub fn probability_to_odds(p: f64) -> f64 {
    p / (1.0 - p)
}

pub fn odds_to_probability(odds: f64) -> f64 {
    odds / (1.0 + odds)
}

pub fn clamp_base_probability(base_probability_pct: f64) -> f64 {
    let p = base_probability_pct / 100.0;
    if p >= 1.0 { MAX_BASE_PROBABILITY } else { p }
}

/// Applies `multipliers` to a fractional probability in odds space.
pub fn adjust_probability(base_probability: f64, multipliers: Multipliers) -> f64 {
    let odds = probability_to_odds(base_probability);
    odds_to_probability(odds * multipliers.product())
}

pub fn final_probability(
    base_probability_pct: f64,
    position: Position,
    leg: Leg,
    height_m: f64,
    age_group: Option<AgeGroup>,
) -> Estimate {
    let base_probability = clamp_base_probability(base_probability_pct);
    let multipliers = Multipliers {
        position: position.multiplier(),
        leg: leg.multiplier(),
        height: tables::height_multiplier(height_m, age_group),
    };
    Estimate {
        base_probability,
        multipliers,
        final_probability: adjust_probability(base_probability, multipliers),
    }
}
