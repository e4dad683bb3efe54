use std::path::PathBuf;

use anyhow::{Context, Result};

use cantera_terminal::catalog::{Catalog, Field};
use cantera_terminal::config::{AppConfig, parse_delimiter};
use cantera_terminal::filters::{self, Selection};
use cantera_terminal::logging::init_tracing;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing(has_flag("-v"));

    let mut cfg = AppConfig::from_env();
    if let Some(path) = arg_value("--data") {
        cfg.data_path = PathBuf::from(path);
    }
    if let Some(raw) = arg_value("--delimiter") {
        cfg.delimiter = parse_delimiter(&raw).context("invalid --delimiter")?;
    }

    let catalog = Catalog::load(&cfg.data_path, cfg.delimiter)
        .with_context(|| format!("load club catalog from {}", cfg.data_path.display()))?;
    let stats = catalog.stats();

    println!("Catalog: {}", cfg.data_path.display());
    println!("  rows read:              {}", stats.rows_read);
    println!("  rows kept:              {}", stats.rows_kept);
    println!("  missing category:       {}", stats.missing_category);
    println!("  bad base probability:   {}", stats.bad_base_probability);
    println!("  undecodable:            {}", stats.undecodable);

    let categories = filters::options(&catalog, Field::Category, &Selection::new());
    println!("Categories ({}):", categories.len());
    for category in &categories {
        let mut sel = Selection::new();
        sel.set(Field::Category, category.as_str());
        let clubs = filters::options(&catalog, Field::Club, &sel);
        println!("  {category}: {} clubs", clubs.len());
    }

    let duplicates = catalog.duplicates();
    if duplicates.is_empty() {
        println!("Duplicate combinations: none");
    } else {
        println!(
            "Duplicate combinations ({}), first row wins:",
            duplicates.len()
        );
        for (key, count) in duplicates {
            let parts = key
                .iter()
                .map(|v| v.as_deref().unwrap_or("-"))
                .collect::<Vec<_>>()
                .join(" | ");
            println!("  {parts} x{count}");
        }
    }

    Ok(())
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
