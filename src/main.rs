use std::io::{self, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, warn};

use cantera_terminal::catalog::{Catalog, Field};
use cantera_terminal::config::{AppConfig, CliArgs, Mode, parse_args};
use cantera_terminal::filters::{self, Selection};
use cantera_terminal::logging::init_tracing;
use cantera_terminal::prompt::{TextShell, parse_height};
use cantera_terminal::report;
use cantera_terminal::session::{self, SessionOutcome};
use cantera_terminal::tables::{Leg, Position};

mod tui;

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cli = parse_args(&args)?;
    init_tracing(cli.verbose);

    let mut cfg = AppConfig::from_env();
    cli.apply_to(&mut cfg);

    let catalog = Catalog::load(&cfg.data_path, cfg.delimiter)
        .with_context(|| format!("load club catalog from {}", cfg.data_path.display()))?;
    let stats = catalog.stats();
    info!(
        "catalog {}: {} usable rows of {}",
        cfg.data_path.display(),
        stats.rows_kept,
        stats.rows_read
    );
    if catalog.is_empty() {
        warn!("catalog has no usable rows; every selection will come up empty");
    }

    match cli.mode {
        Mode::Prompt => run_prompt(&catalog, &cli),
        Mode::Form => tui::run(&catalog, cfg.default_height_cm),
        Mode::Quick => run_quick(&catalog, &cli),
        Mode::Options => run_options(&catalog, &cli),
    }
}

fn run_prompt(catalog: &Catalog, cli: &CliArgs) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.json {
        writeln!(out, "Welcome to the youth football probability assistant!")?;
        writeln!(
            out,
            "I will ask you step by step to estimate the chance of reaching LaLiga.\n"
        )?;
    }

    let mut shell = TextShell::new(stdin.lock(), out).with_json(cli.json);
    match session::run_session(catalog, &mut shell)? {
        SessionOutcome::Completed(report) => {
            info!("session finished at {:.4}%", report.final_probability_pct)
        }
        SessionOutcome::NotFound(selection) => info!("no catalog row for {:?}", selection),
        SessionOutcome::NoOptions(field) => info!("no options left for {}", field.label()),
        SessionOutcome::Aborted => info!("input closed before the session finished"),
    }
    Ok(())
}

fn run_quick(catalog: &Catalog, cli: &CliArgs) -> Result<()> {
    let mut selection = Selection::new();
    for field in Field::ORDER {
        let value = cli
            .quick
            .field(field)
            .ok_or_else(|| anyhow!("missing --{}", field.label()))?;
        selection.set(field, value);
    }
    let position = cli
        .quick
        .position
        .as_deref()
        .ok_or_else(|| anyhow!("missing --position"))?
        .parse::<Position>()
        .map_err(|e| anyhow!(e))?;
    let leg = cli
        .quick
        .leg
        .as_deref()
        .ok_or_else(|| anyhow!("missing --leg"))?
        .parse::<Leg>()
        .map_err(|e| anyhow!(e))?;
    let raw_height = cli
        .quick
        .height
        .as_deref()
        .ok_or_else(|| anyhow!("missing --height"))?;
    let Some(height_m) = parse_height(raw_height) else {
        bail!("invalid --height: {raw_height}");
    };

    let report = session::estimate_for_selection(catalog, &selection, position, leg, height_m)?;
    if cli.json {
        println!("{}", report.to_json().context("serialize report")?);
    } else {
        println!("{}", report::selection_line(&report));
        for line in report::result_lines(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

fn run_options(catalog: &Catalog, cli: &CliArgs) -> Result<()> {
    let raw = cli
        .quick
        .column
        .as_deref()
        .ok_or_else(|| anyhow!("missing --column (category|division|zone|club)"))?;
    let target = Field::parse(raw).ok_or_else(|| anyhow!("invalid --column: {raw}"))?;

    let mut selection = Selection::new();
    for field in Field::ORDER.into_iter().filter(|f| *f < target) {
        if let Some(value) = cli.quick.field(field) {
            selection.set(field, value);
        }
    }

    let opts = filters::options(catalog, target, &selection);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&opts)?);
    } else {
        for opt in &opts {
            println!("{opt}");
        }
    }
    if opts.is_empty() {
        warn!("no {} matches the given filters", target.label());
    }
    Ok(())
}
