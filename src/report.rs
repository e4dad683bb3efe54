use serde::Serialize;

use crate::catalog::{ClubRecord, Field};
use crate::engine::Estimate;
use crate::tables::{AgeGroup, Leg, Position};

/// Everything shown to the user once a session finishes.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub category: String,
    pub division: Option<String>,
    pub zone: Option<String>,
    pub club: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub position: Position,
    pub leg: Leg,
    pub height_m: f64,
    pub base_probability_pct: f64,
    pub position_multiplier: f64,
    pub leg_multiplier: f64,
    pub height_multiplier: f64,
    pub final_probability_pct: f64,
}

impl Report {
    pub fn new(
        record: &ClubRecord,
        age_group: Option<AgeGroup>,
        position: Position,
        leg: Leg,
        height_m: f64,
        estimate: &Estimate,
    ) -> Self {
        Self {
            category: record.category.clone(),
            division: record.value(Field::Division).map(str::to_string),
            zone: record.value(Field::Zone).map(str::to_string),
            club: record.value(Field::Club).map(str::to_string),
            age_group,
            position,
            leg,
            height_m,
            base_probability_pct: estimate.base_probability * 100.0,
            position_multiplier: estimate.multipliers.position,
            leg_multiplier: estimate.multipliers.leg,
            height_multiplier: estimate.multipliers.height,
            final_probability_pct: estimate.final_probability * 100.0,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn result_lines(report: &Report) -> Vec<String> {
    vec![
        format!("Base probability: {:.4}%", report.base_probability_pct),
        format!(
            "Multipliers applied: position ({:.2}), leg ({:.2}), height ({:.2})",
            report.position_multiplier, report.leg_multiplier, report.height_multiplier
        ),
        format!("Final probability: {:.4}%", report.final_probability_pct),
    ]
}

pub fn selection_line(report: &Report) -> String {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | {} | {} | {} | {} | {:.2} m",
        report.category,
        dash(&report.division),
        dash(&report.zone),
        dash(&report.club),
        report.position,
        report.leg,
        report.height_m
    )
}
