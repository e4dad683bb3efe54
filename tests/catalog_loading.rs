use std::fs;
use std::path::PathBuf;

use cantera_terminal::catalog::{Catalog, CatalogError, Field};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn loads_sheet_export_and_drops_unusable_rows() {
    let catalog = Catalog::load(&fixture_path("clubs.csv"), b',').expect("fixture should load");
    let stats = catalog.stats();
    assert_eq!(stats.rows_read, 14);
    assert_eq!(stats.rows_kept, 11);
    assert_eq!(stats.missing_category, 1);
    assert_eq!(stats.bad_base_probability, 2);
    assert_eq!(catalog.len(), 11);
    assert!(catalog.rows().iter().all(|r| !r.category.is_empty()));
}

#[test]
fn percent_sign_is_stripped_before_parsing() {
    let catalog = Catalog::load(&fixture_path("clubs.csv"), b',').unwrap();
    let first = &catalog.rows()[0];
    assert_eq!(first.category, "Cadet A");
    assert_eq!(first.value(Field::Division), Some("Divisió d'Honor"));
    assert_eq!(first.value(Field::Zone), Some("Barcelona"));
    assert_eq!(first.value(Field::Club), Some("FC Barcelona"));
    assert_eq!(first.base_probability_pct, 12.0);

    let girona = catalog
        .rows()
        .iter()
        .find(|r| r.club.as_deref() == Some("Girona FC"))
        .expect("Girona row should be kept");
    assert_eq!(girona.base_probability_pct, 6.5);
}

#[test]
fn empty_cells_become_missing_values() {
    let catalog = Catalog::load(&fixture_path("clubs.csv"), b',').unwrap();
    let no_club = catalog
        .rows()
        .iter()
        .find(|r| r.category == "Cadet B")
        .expect("row without club is still usable");
    assert_eq!(no_club.club, None);
    assert_eq!(no_club.value(Field::Division), Some("Primera"));
}

#[test]
fn english_headers_and_semicolons_are_accepted() {
    let raw = read_fixture("clubs_semicolon.csv");
    let catalog = Catalog::from_reader(raw.as_bytes(), b';').unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.rows()[0].club.as_deref(), Some("UE Olot"));
    assert_eq!(catalog.rows()[0].base_probability_pct, 5.0);
    assert_eq!(catalog.stats().bad_base_probability, 2);
}

#[test]
fn decimal_comma_cells_are_kept() {
    let raw = read_fixture("clubs_semicolon.csv");
    let catalog = Catalog::from_reader(raw.as_bytes(), b';').unwrap();
    let llagostera = catalog
        .rows()
        .iter()
        .find(|r| r.club.as_deref() == Some("UE Llagostera"))
        .expect("decimal comma row should be kept");
    assert_eq!(llagostera.base_probability_pct, 6.5);
}

#[test]
fn negative_base_rows_are_dropped() {
    let catalog = Catalog::load(&fixture_path("clubs.csv"), b',').unwrap();
    assert!(catalog.rows().iter().all(|r| r.base_probability_pct >= 0.0));
    assert!(
        catalog
            .rows()
            .iter()
            .all(|r| r.club.as_deref() != Some("CE Banyoles"))
    );

    let raw = "Categoria,Club,base\nInfantil A,CE Banyoles,-5%\nCadet A,CE Figueres,-2000%\n";
    let catalog = Catalog::from_reader(raw.as_bytes(), b',').unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.stats().bad_base_probability, 2);
}

#[test]
fn duplicate_tuples_are_reported() {
    let catalog = Catalog::load(&fixture_path("clubs.csv"), b',').unwrap();
    let dups = catalog.duplicates();
    assert_eq!(dups.len(), 1);
    let (key, count) = &dups[0];
    assert_eq!(key[0].as_deref(), Some("Cadet A"));
    assert_eq!(key[3].as_deref(), Some("FC Barcelona"));
    assert_eq!(*count, 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Catalog::load(&fixture_path("does_not_exist.csv"), b',').unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
