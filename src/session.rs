use anyhow::Result;
use tracing::{debug, info};

use crate::catalog::{Catalog, ClubRecord, Field};
use crate::engine;
use crate::filters::{self, LookupError, Selection};
use crate::report::Report;
use crate::tables::{self, Leg, Position};

/// What a front end has to provide so `run_session` can walk the selection steps.
pub trait Shell {
    /// Index into `options`, or `None` once the input is exhausted.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>>;

    /// Height in meters, or `None` once the input is exhausted.
    fn read_height(&mut self, prompt: &str) -> Result<Option<f64>>;

    fn show_message(&mut self, msg: &str) -> Result<()>;

    fn show_report(&mut self, report: &Report) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Completed(Report),
    NotFound(Selection),
    NoOptions(Field),
    Aborted,
}

pub fn prompt_for(field: Field) -> &'static str {
    match field {
        Field::Category => "Select the category:",
        Field::Division => "Select the division:",
        Field::Zone => "Select the geographic zone:",
        Field::Club => "Select the club:",
    }
}

/// Resolves the selection to a catalog row and runs the engine for one player.
pub fn estimate_for_selection(
    catalog: &Catalog,
    selection: &Selection,
    position: Position,
    leg: Leg,
    height_m: f64,
) -> Result<Report, LookupError> {
    let record = filters::lookup(catalog, selection)?;
    Ok(estimate_for_record(record, position, leg, height_m))
}

/// Runs the engine against a row that has already been resolved.
pub fn estimate_for_record(
    record: &ClubRecord,
    position: Position,
    leg: Leg,
    height_m: f64,
) -> Report {
    let age_group = tables::age_group_for_category(&record.category);
    let estimate = engine::final_probability(
        record.base_probability_pct,
        position,
        leg,
        height_m,
        age_group,
    );
    debug!(
        "estimate for {:?}: base={} final={}",
        record.club, estimate.base_probability, estimate.final_probability
    );
    Report::new(record, age_group, position, leg, height_m, &estimate)
}

pub fn run_session<S: Shell>(catalog: &Catalog, shell: &mut S) -> Result<SessionOutcome> {
    let mut selection = Selection::new();

    for field in Field::ORDER {
        let opts = filters::options(catalog, field, &selection);
        if opts.is_empty() {
            shell.show_message(&format!(
                "No {} available for the current selection.",
                field.label()
            ))?;
            return Ok(SessionOutcome::NoOptions(field));
        }
        let Some(idx) = shell.choose(prompt_for(field), &opts)? else {
            return Ok(SessionOutcome::Aborted);
        };
        let Some(value) = opts.get(idx) else {
            return Ok(SessionOutcome::Aborted);
        };
        selection.set(field, value.clone());
    }

    let record = match filters::lookup(catalog, &selection) {
        Ok(record) => record,
        Err(err) => {
            info!("lookup failed: {err}");
            shell.show_message("Combination not found. Try again.")?;
            return Ok(SessionOutcome::NotFound(selection));
        }
    };
    debug!("resolved base probability {}%", record.base_probability_pct);

    let labels: Vec<String> = Position::ALL.iter().map(|p| p.label().to_string()).collect();
    let Some(pos_idx) = shell.choose("Select the position:", &labels)? else {
        return Ok(SessionOutcome::Aborted);
    };
    let Some(position) = Position::ALL.get(pos_idx).copied() else {
        return Ok(SessionOutcome::Aborted);
    };

    let labels: Vec<String> = Leg::ALL.iter().map(|l| l.label().to_string()).collect();
    let Some(leg_idx) = shell.choose("Select the dominant leg:", &labels)? else {
        return Ok(SessionOutcome::Aborted);
    };
    let Some(leg) = Leg::ALL.get(leg_idx).copied() else {
        return Ok(SessionOutcome::Aborted);
    };

    let Some(height_m) = shell.read_height("Enter the height in meters (e.g. 1.75): ")? else {
        return Ok(SessionOutcome::Aborted);
    };

    let report = estimate_for_record(record, position, leg, height_m);
    shell.show_report(&report)?;
    Ok(SessionOutcome::Completed(report))
}
