use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

use crate::catalog::Field;

pub const DEFAULT_DATA_PATH: &str = "datos_futbol.csv";
pub const FORM_HEIGHT_MIN_CM: u16 = 165;
pub const FORM_HEIGHT_MAX_CM: u16 = 200;
pub const FORM_HEIGHT_DEFAULT_CM: u16 = 175;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub delimiter: u8,
    pub default_height_cm: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            delimiter: b',',
            default_height_cm: FORM_HEIGHT_DEFAULT_CM,
        }
    }
}

impl AppConfig {
    /// Reads `CANTERA_*` variables; anything missing or malformed keeps its default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(path) = env::var("CANTERA_DATA")
            && !path.trim().is_empty()
        {
            cfg.data_path = PathBuf::from(path.trim());
        }
        if let Some(delim) = env::var("CANTERA_DELIMITER")
            .ok()
            .and_then(|raw| parse_delimiter(&raw))
        {
            cfg.delimiter = delim;
        }
        if let Some(meters) = env::var("CANTERA_HEIGHT_DEFAULT")
            .ok()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|m| m.is_finite())
        {
            cfg.default_height_cm = meters_to_form_cm(meters);
        }
        cfg
    }
}

/// Rounds to whole centimeters inside the form's height range.
pub fn meters_to_form_cm(height_m: f64) -> u16 {
    let cm = (height_m * 100.0).round();
    cm.clamp(FORM_HEIGHT_MIN_CM as f64, FORM_HEIGHT_MAX_CM as f64) as u16
}

pub fn parse_delimiter(raw: &str) -> Option<u8> {
    let trimmed = raw.trim();
    if raw == "\t" || trimmed == "\\t" || trimmed.eq_ignore_ascii_case("tab") {
        return Some(b'\t');
    }
    let bytes = trimmed.as_bytes();
    (bytes.len() == 1).then(|| bytes[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Prompt,
    Form,
    Quick,
    Options,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickArgs {
    pub category: Option<String>,
    pub division: Option<String>,
    pub zone: Option<String>,
    pub club: Option<String>,
    pub position: Option<String>,
    pub leg: Option<String>,
    pub height: Option<String>,
    pub column: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub mode: Mode,
    pub data_path: Option<PathBuf>,
    pub delimiter: Option<u8>,
    pub json: bool,
    pub verbose: bool,
    pub quick: QuickArgs,
}

impl CliArgs {
    pub fn apply_to(&self, cfg: &mut AppConfig) {
        if let Some(path) = &self.data_path {
            cfg.data_path = path.clone();
        }
        if let Some(delim) = self.delimiter {
            cfg.delimiter = delim;
        }
    }
}

impl QuickArgs {
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Category => self.category.as_deref(),
            Field::Division => self.division.as_deref(),
            Field::Zone => self.zone.as_deref(),
            Field::Club => self.club.as_deref(),
        }
    }
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs {
        mode: Mode::Prompt,
        data_path: None,
        delimiter: None,
        json: false,
        verbose: false,
        quick: QuickArgs::default(),
    };

    let mut i = 0usize;
    if let Some(first) = args.first()
        && !first.starts_with('-')
    {
        out.mode = match first.as_str() {
            "prompt" => Mode::Prompt,
            "form" => Mode::Form,
            "quick" => Mode::Quick,
            "options" => Mode::Options,
            other => bail!("unsupported command: {other} (use prompt|form|quick|options)"),
        };
        i = 1;
    }

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--json" => out.json = true,
            "-v" | "--verbose" => out.verbose = true,
            "--data" | "--delimiter" | "--category" | "--division" | "--zone" | "--club"
            | "--position" | "--leg" | "--height" | "--column" => {
                i += 1;
                let value = args
                    .get(i)
                    .cloned()
                    .ok_or_else(|| anyhow!("missing value for {arg}"))?;
                match arg {
                    "--data" => out.data_path = Some(PathBuf::from(value)),
                    "--delimiter" => {
                        out.delimiter = Some(
                            parse_delimiter(&value)
                                .ok_or_else(|| anyhow!("invalid --delimiter: {value}"))?,
                        )
                    }
                    "--category" => out.quick.category = Some(value),
                    "--division" => out.quick.division = Some(value),
                    "--zone" => out.quick.zone = Some(value),
                    "--club" => out.quick.club = Some(value),
                    "--position" => out.quick.position = Some(value),
                    "--leg" => out.quick.leg = Some(value),
                    "--height" => out.quick.height = Some(value),
                    _ => out.quick.column = Some(value),
                }
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    Ok(out)
}
