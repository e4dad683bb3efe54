use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Porter,
    Defensa,
    Migcampista,
    Devanter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    Dreta,
    Esquerra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Infantil,
    Cadet,
    Juvenil,
}

/// Closed height interval in meters with one multiplier per age group.
#[derive(Debug, Clone, Copy)]
pub struct HeightBand {
    pub min_m: f64,
    pub max_m: f64,
    pub infantil: Option<f64>,
    pub cadet: Option<f64>,
    pub juvenil: Option<f64>,
}

impl HeightBand {
    pub fn contains(&self, height_m: f64) -> bool {
        self.min_m <= height_m && height_m <= self.max_m
    }

    pub fn multiplier_for(&self, group: AgeGroup) -> Option<f64> {
        match group {
            AgeGroup::Infantil => self.infantil,
            AgeGroup::Cadet => self.cadet,
            AgeGroup::Juvenil => self.juvenil,
        }
    }
}

const fn band(min_m: f64, max_m: f64, infantil: f64, cadet: f64, juvenil: f64) -> HeightBand {
    HeightBand {
        min_m,
        max_m,
        infantil: Some(infantil),
        cadet: Some(cadet),
        juvenil: Some(juvenil),
    }
}

// Ascending by lower bound; lookups scan in this order and stop at the first hit.
const HEIGHT_BANDS: &[HeightBand] = &[
    band(1.65, 1.70, 0.99, 0.97, 0.95),
    band(1.71, 1.75, 1.00, 1.00, 0.98),
    band(1.76, 1.80, 1.03, 1.02, 1.01),
    band(1.81, 1.85, 1.08, 1.05, 1.03),
    band(1.86, 1.90, 1.12, 1.08, 1.05),
    band(1.91, 1.95, 1.15, 1.10, 1.06),
    band(1.96, 2.00, 1.18, 1.12, 1.07),
];

const AGE_GROUP_RULES: &[(&str, AgeGroup)] = &[
    ("Infantil", AgeGroup::Infantil),
    ("Cadet", AgeGroup::Cadet),
    ("Juvenil", AgeGroup::Juvenil),
];

pub fn height_bands() -> &'static [HeightBand] {
    HEIGHT_BANDS
}

pub fn find_height_band(height_m: f64) -> Option<&'static HeightBand> {
    HEIGHT_BANDS.iter().find(|band| band.contains(height_m))
}

/// Height adjustment for a player; 1.0 whenever no band or no age group applies.
pub fn height_multiplier(height_m: f64, group: Option<AgeGroup>) -> f64 {
    let Some(group) = group else {
        return 1.0;
    };
    find_height_band(height_m)
        .and_then(|band| band.multiplier_for(group))
        .unwrap_or(1.0)
}

pub fn age_group_for_category(category: &str) -> Option<AgeGroup> {
    AGE_GROUP_RULES
        .iter()
        .find(|(needle, _)| category.contains(needle))
        .map(|(_, group)| *group)
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Porter,
        Position::Defensa,
        Position::Migcampista,
        Position::Devanter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Position::Porter => "Porter",
            Position::Defensa => "Defensa",
            Position::Migcampista => "Migcampista",
            Position::Devanter => "Devanter",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Position::Porter => 0.90,
            Position::Defensa => 0.95,
            Position::Migcampista => 1.02,
            Position::Devanter => 1.08,
        }
    }
}

impl Leg {
    pub const ALL: [Leg; 2] = [Leg::Dreta, Leg::Esquerra];

    pub fn label(self) -> &'static str {
        match self {
            Leg::Dreta => "Dreta",
            Leg::Esquerra => "Esquerra",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Leg::Dreta => 1.00,
            Leg::Esquerra => 1.05,
        }
    }
}

impl AgeGroup {
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Infantil => "Infantil",
            AgeGroup::Cadet => "Cadet",
            AgeGroup::Juvenil => "Juvenil",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Position::ALL
            .into_iter()
            .find(|pos| pos.label().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown position: {raw}"))
    }
}

impl FromStr for Leg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Leg::ALL
            .into_iter()
            .find(|leg| leg.label().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown leg: {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_ascending_and_disjoint() {
        let bands = height_bands();
        assert_eq!(bands.first().map(|b| b.min_m), Some(1.65));
        assert_eq!(bands.last().map(|b| b.max_m), Some(2.00));
        for pair in bands.windows(2) {
            assert!(pair[0].max_m < pair[1].min_m);
        }
    }

    #[test]
    fn boundary_heights_pick_neighbouring_bands() {
        let low = find_height_band(1.70).unwrap();
        let high = find_height_band(1.71).unwrap();
        assert_eq!(low.min_m, 1.65);
        assert_eq!(high.min_m, 1.71);
        assert_eq!(height_multiplier(1.70, Some(AgeGroup::Juvenil)), 0.95);
        assert_eq!(height_multiplier(1.71, Some(AgeGroup::Juvenil)), 0.98);
    }

    #[test]
    fn gaps_and_out_of_range_are_neutral() {
        assert_eq!(height_multiplier(1.705, Some(AgeGroup::Cadet)), 1.0);
        assert_eq!(height_multiplier(1.50, Some(AgeGroup::Cadet)), 1.0);
        assert_eq!(height_multiplier(2.10, Some(AgeGroup::Infantil)), 1.0);
        assert_eq!(height_multiplier(1.90, None), 1.0);
    }

    #[test]
    fn age_group_first_rule_wins() {
        assert_eq!(age_group_for_category("Cadet A"), Some(AgeGroup::Cadet));
        assert_eq!(age_group_for_category("Juvenil Divisió d'Honor"), Some(AgeGroup::Juvenil));
        assert_eq!(age_group_for_category("Infantil Cadet mix"), Some(AgeGroup::Infantil));
        assert_eq!(age_group_for_category("Senior"), None);
        assert_eq!(age_group_for_category("cadet"), None);
    }

    #[test]
    fn every_position_and_leg_has_its_multiplier() {
        let positions = Position::ALL.map(Position::multiplier);
        assert_eq!(positions, [0.90, 0.95, 1.02, 1.08]);
        let legs = Leg::ALL.map(Leg::multiplier);
        assert_eq!(legs, [1.00, 1.05]);
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!("devanter".parse::<Position>().unwrap(), Position::Devanter);
        assert_eq!(" Esquerra ".parse::<Leg>().unwrap(), Leg::Esquerra);
        assert!("Lateral".parse::<Position>().is_err());
    }
}
