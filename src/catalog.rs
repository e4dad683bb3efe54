use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubRecord {
    pub category: String,
    pub division: Option<String>,
    pub zone: Option<String>,
    pub club: Option<String>,
    pub base_probability_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Category,
    Division,
    Zone,
    Club,
}

impl Field {
    /// Cascade order used by every shell.
    pub const ORDER: [Field; 4] = [Field::Category, Field::Division, Field::Zone, Field::Club];

    pub fn label(self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Division => "division",
            Field::Zone => "zone",
            Field::Club => "club",
        }
    }

    pub fn parse(raw: &str) -> Option<Field> {
        Field::ORDER
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(raw.trim()))
    }
}

impl ClubRecord {
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Category => Some(self.category.as_str()),
            Field::Division => self.division.as_deref(),
            Field::Zone => self.zone.as_deref(),
            Field::Club => self.club.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub missing_category: usize,
    pub bad_base_probability: usize,
    pub undecodable: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<ClubRecord>,
    stats: LoadStats,
}

// Header names follow the club sheet; the English aliases cover hand-made exports.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Categoria", alias = "category", alias = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Divisió", alias = "division", alias = "Division", default)]
    division: Option<String>,
    #[serde(rename = "Zona geogràfica", alias = "zone", alias = "Zone", default)]
    zone: Option<String>,
    #[serde(rename = "Club", alias = "club", default)]
    club: Option<String>,
    #[serde(
        rename = "% \"Base\" per arribar a Laliga",
        alias = "base_probability",
        alias = "base",
        default
    )]
    base: Option<String>,
}

impl Catalog {
    pub fn from_records(rows: Vec<ClubRecord>) -> Self {
        let stats = LoadStats {
            rows_read: rows.len(),
            rows_kept: rows.len(),
            ..LoadStats::default()
        };
        Self { rows, stats }
    }

    pub fn load(path: &Path, delimiter: u8) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_reader(file, delimiter).map_err(|source| CatalogError::Csv {
            path: display,
            source,
        })
    }

    pub fn from_reader<R: Read>(rdr: R, delimiter: u8) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        // Fails early on a missing or unreadable header row.
        reader.headers()?;

        let mut rows = Vec::new();
        let mut stats = LoadStats::default();
        for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
            stats.rows_read += 1;
            let line = idx + 2;
            let raw = match result {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("skipping catalog line {line}: {err}");
                    stats.undecodable += 1;
                    continue;
                }
            };
            let Some(category) = non_empty(raw.category) else {
                debug!("skipping catalog line {line}: missing category");
                stats.missing_category += 1;
                continue;
            };
            let Some(base_probability_pct) = raw.base.as_deref().and_then(parse_percentage) else {
                debug!("skipping catalog line {line}: unusable base probability");
                stats.bad_base_probability += 1;
                continue;
            };
            rows.push(ClubRecord {
                category,
                division: non_empty(raw.division),
                zone: non_empty(raw.zone),
                club: non_empty(raw.club),
                base_probability_pct,
            });
        }
        stats.rows_kept = rows.len();
        debug!(
            "catalog loaded: kept {} of {} rows",
            stats.rows_kept, stats.rows_read
        );
        Ok(Self { rows, stats })
    }

    pub fn rows(&self) -> &[ClubRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// (category, division, zone, club) tuples appearing more than once, with their row count.
    pub fn duplicates(&self) -> Vec<([Option<String>; 4], usize)> {
        let mut counts: BTreeMap<[Option<String>; 4], usize> = BTreeMap::new();
        for row in &self.rows {
            let key = Field::ORDER.map(|f| row.value(f).map(str::to_string));
            *counts.entry(key).or_insert(0) += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).collect()
    }
}

/// Percentage cell to a number, dropping every `%` sign first. A lone decimal
/// comma (`6,5`) reads as a decimal point. Negative values are rejected.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let mut cleaned = raw.replace('%', "");
    if !cleaned.contains('.') && cleaned.matches(',').count() == 1 {
        cleaned = cleaned.replace(',', ".");
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_percentage_strips_sign() {
        assert_eq!(parse_percentage("5%"), Some(5.0));
        assert_eq!(parse_percentage(" 12.5 % "), Some(12.5));
        assert_eq!(parse_percentage("0.75"), Some(0.75));
        assert_eq!(parse_percentage("%"), None);
        assert_eq!(parse_percentage("n/a"), None);
        assert_eq!(parse_percentage("nan"), None);
    }

    #[test]
    fn parse_percentage_rejects_negatives() {
        assert_eq!(parse_percentage("-5%"), None);
        assert_eq!(parse_percentage("-2000"), None);
        assert_eq!(parse_percentage("0%"), Some(0.0));
    }

    #[test]
    fn parse_percentage_reads_decimal_comma() {
        assert_eq!(parse_percentage("6,5%"), Some(6.5));
        assert_eq!(parse_percentage(" 0,75 "), Some(0.75));
        assert_eq!(parse_percentage("1,2,3"), None);
        assert_eq!(parse_percentage("1.5,0"), None);
    }

    #[test]
    fn field_parse_is_case_insensitive() {
        assert_eq!(Field::parse("Zone"), Some(Field::Zone));
        assert_eq!(Field::parse("club "), Some(Field::Club));
        assert_eq!(Field::parse("position"), None);
    }
}
