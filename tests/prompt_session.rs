use std::io::Cursor;
use std::path::PathBuf;

use cantera_terminal::catalog::{Catalog, ClubRecord, Field};
use cantera_terminal::prompt::TextShell;
use cantera_terminal::session::{self, SessionOutcome};
use cantera_terminal::tables::{AgeGroup, Leg, Position};

fn fixture_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("clubs.csv");
    Catalog::load(&path, b',').expect("fixture should load")
}

fn run_script(catalog: &Catalog, script: &str, json: bool) -> (SessionOutcome, String) {
    let input = Cursor::new(script.as_bytes().to_vec());
    let mut shell = TextShell::new(input, Vec::new()).with_json(json);
    let outcome = session::run_session(catalog, &mut shell).expect("session should not fail");
    let output = String::from_utf8(shell.into_output()).expect("utf8 output");
    (outcome, output)
}

#[test]
fn full_walk_prints_numbered_menus_and_result() {
    let catalog = fixture_catalog();
    let (outcome, output) = run_script(&catalog, "1\n1\n1\n1\n4\n2\n1.78\n", false);

    let SessionOutcome::Completed(report) = outcome else {
        panic!("expected a completed session, got {outcome:?}");
    };
    assert_eq!(report.club.as_deref(), Some("FC Barcelona"));
    assert_eq!(report.age_group, Some(AgeGroup::Cadet));
    assert_eq!(report.position, Position::Devanter);
    assert_eq!(report.leg, Leg::Esquerra);

    assert!(output.contains("Select the category:\n1. Cadet A\n2. Cadet B\n"));
    assert!(output.contains(
        "Select the position:\n1. Porter\n2. Defensa\n3. Migcampista\n4. Devanter\n"
    ));
    assert!(output.contains("Base probability: 12.0000%"));
    assert!(output.contains("Multipliers applied: position (1.08), leg (1.05), height (1.02)"));
    assert!(output.contains("Final probability: 13.6240%"));
}

#[test]
fn invalid_entries_reprompt_without_failing() {
    let catalog = fixture_catalog();
    let script = "abc\n0\n99\n4\n1\n1\n1\n1\n1\nhigh\n1,70\n1.70\n";
    let (outcome, output) = run_script(&catalog, script, false);

    assert!(output.contains("Invalid input. Enter a number."));
    assert!(output.contains("Invalid number. Try again."));
    assert!(output.contains("Invalid input. Enter a decimal number."));

    let SessionOutcome::Completed(report) = outcome else {
        panic!("expected a completed session, got {outcome:?}");
    };
    assert_eq!(report.category, "Juvenil A");
    assert_eq!(report.height_m, 1.70);
    assert_eq!(report.height_multiplier, 0.95);
    assert!(output.contains("Base probability: 99.9000%"));
    assert!(output.contains("Final probability: 99.8831%"));
}

#[test]
fn category_without_clubs_stops_early() {
    let catalog = fixture_catalog();
    let (outcome, output) = run_script(&catalog, "2\n1\n1\n", false);
    assert!(matches!(outcome, SessionOutcome::NoOptions(Field::Club)));
    assert!(output.contains("No club available for the current selection."));
    assert!(!output.contains("Select the position:"));
}

#[test]
fn closed_input_aborts_cleanly() {
    let catalog = fixture_catalog();
    let (outcome, _) = run_script(&catalog, "1\n1\n", false);
    assert!(matches!(outcome, SessionOutcome::Aborted));
}

#[test]
fn json_output_carries_every_result_field() {
    let catalog = fixture_catalog();
    let (_, output) = run_script(&catalog, "3\n1\n1\n1\n3\n1\n1.80\n", true);
    let start = output.find('{').expect("json object in output");
    let value: serde_json::Value = serde_json::from_str(&output[start..]).expect("valid json");
    assert_eq!(value["category"], "Infantil A");
    assert_eq!(value["club"], "Nàstic");
    assert_eq!(value["position"], "Migcampista");
    assert_eq!(value["height_multiplier"], 1.03);
    let final_pct = value["final_probability_pct"].as_f64().unwrap();
    assert!((final_pct - 3.1470).abs() < 1e-4);
}

#[test]
fn estimate_for_unknown_combination_is_not_found() {
    let catalog = Catalog::from_records(vec![ClubRecord {
        category: "Cadet A".to_string(),
        division: Some("Preferent".to_string()),
        zone: Some("Barcelona".to_string()),
        club: Some("CE Europa".to_string()),
        base_probability_pct: 2.0,
    }]);
    let mut sel = cantera_terminal::filters::Selection::new();
    sel.set(Field::Category, "Cadet A");
    sel.set(Field::Division, "Preferent");
    sel.set(Field::Zone, "Barcelona");
    sel.set(Field::Club, "FC Barcelona");
    let err = session::estimate_for_selection(&catalog, &sel, Position::Porter, Leg::Dreta, 1.75)
        .unwrap_err();
    assert_eq!(err.to_string(), "combination not found");
}
