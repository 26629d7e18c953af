//! End-to-end: catalog CSV on disk -> resolve -> calculate -> render.

use std::fs;
use std::path::Path;

use num_rational::Ratio;

use pipecut::app::pipeline::{CalcInput, load_workspace, run_calculation};
use pipecut::app::settings::Settings;
use pipecut::calc::parse_measurement;
use pipecut::catalog::{Resolver, normalize_size};
use pipecut::domain::{CatalogConfig, FittingSpec};
use pipecut::error::{AppError, CutError};
use pipecut::io::{load_catalog, read_overrides_json, write_catalog};
use pipecut::report::{format_calculation, render_result, to_sixteenths_fraction};

const ELBOW: &str = "Elbow 90(Socket x Socket)";
const TEE: &str = "Tee (Reducing)";

const CATALOG: &str = "Part,Size (inches),G,G1
Elbow 90(Socket x Socket),1.5,0.6875,
Elbow 90(Socket x Socket),2.0,0.75,
Elbow 90(Socket x Socket),3,1/0,
Tee (Reducing),2x2x1,0.9,0.6
Bushing (Spigot x Socket),2x1.5,0.375,0.25
";

fn settings_for(dir: &Path) -> Settings {
    let catalog = dir.join("catalog.csv");
    fs::write(&catalog, CATALOG).unwrap();
    Settings::from_lookup(|_| None).with_paths(Some(catalog), Some(dir.join("jobs.json")), None)
}

#[test]
fn standard_cut_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let ws = load_workspace(&settings_for(dir.path())).unwrap();

    let input = CalcInput::Standard {
        a: FittingSpec::new(ELBOW, "2"),
        b: FittingSpec::new(ELBOW, "1.5"),
        c2c: Ratio::from_integer(12),
    };
    let out = run_calculation(&ws.resolver(), &input, false).unwrap();
    let rendered = render_result(&out.result);
    assert_eq!(rendered[0].decimal, "10.56250");
    assert_eq!(rendered[0].fraction, "10 9/16");

    let report = format_calculation(&out.request, &out.result, out.shaved);
    assert!(report.starts_with("=== Standard Cut ==="));
    assert!(report.contains("10 9/16"));
}

#[test]
fn lay_in_cut_renders_both_pieces() {
    let dir = tempfile::tempdir().unwrap();
    let ws = load_workspace(&settings_for(dir.path())).unwrap();

    let input = CalcInput::LayIn {
        a: FittingSpec::new(ELBOW, "2"),
        lay_in: FittingSpec::new(TEE, "2X2X1"),
        b: FittingSpec::new(ELBOW, "2"),
        c2c_overall: Ratio::from_integer(20),
        c2c_lay_in: Ratio::new(121, 10),
    };
    let out = run_calculation(&ws.resolver(), &input, false).unwrap();
    // cut 1: 20 - 12.1 - 0.75 = 7.15, cut 2: 12.1 - 0.75 - 0.9 = 10.45
    let fractions: Vec<String> = render_result(&out.result).into_iter().map(|r| r.fraction).collect();
    assert_eq!(fractions, vec!["7 1/8", "10 7/16"]);
}

#[test]
fn override_file_wins_over_catalog_row() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = dir.path().join("overrides.json");
    fs::write(
        &overrides,
        r#"[{"fitting_type": "Elbow 90(Socket x Socket)", "size": "2", "primary": "1"}]"#,
    )
    .unwrap();
    let settings = settings_for(dir.path()).with_paths(None, None, Some(overrides));
    let ws = load_workspace(&settings).unwrap();

    let offset = ws.resolver().resolve(ELBOW, "2.0").unwrap();
    assert_eq!(offset, Ratio::from_integer(1));
    // Catalog still answers for keys without an override.
    assert_eq!(ws.resolver().resolve(ELBOW, "1.5").unwrap(), Ratio::new(11, 16));
}

#[test]
fn malformed_offset_fails_only_when_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let ws = load_workspace(&settings_for(dir.path())).unwrap();

    let err = ws.resolver().resolve(ELBOW, "3").unwrap_err();
    assert!(matches!(err, CutError::InvalidOffsetFormat { ref value, .. } if value == "1/0"));
    assert!(ws.resolver().resolve(ELBOW, "2").is_ok());
}

#[test]
fn unknown_size_lists_alternatives() {
    let dir = tempfile::tempdir().unwrap();
    let ws = load_workspace(&settings_for(dir.path())).unwrap();

    let err = ws.resolver().resolve(ELBOW, "4").unwrap_err();
    assert_eq!(
        err,
        CutError::SizeNotFound {
            fitting_type: ELBOW.to_string(),
            size: "4".to_string(),
            available: vec!["1.5".to_string(), "2".to_string(), "3".to_string()],
        }
    );
}

#[test]
fn empty_catalog_is_exit_code_three() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    fs::write(&path, "Part,Size,G,G1\n").unwrap();
    let settings = Settings::from_lookup(|_| None).with_paths(Some(path), None, None);
    assert_eq!(load_workspace(&settings).unwrap_err().exit_code(), 3);
}

#[test]
fn added_rows_survive_a_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(dir.path());
    let config = CatalogConfig::default();

    let mut catalog = load_catalog(&settings.catalog_path, &config).unwrap().catalog;
    catalog
        .add_entry(pipecut::catalog::CatalogEntry::new(
            "Union (Socket x Socket)",
            "2",
            Some("1 3/8".to_string()),
            None,
        ))
        .unwrap();
    write_catalog(&settings.catalog_path, &catalog, &config).unwrap();

    let reloaded = load_catalog(&settings.catalog_path, &config).unwrap().catalog;
    let resolver = Resolver::new(&reloaded, &config);
    assert_eq!(resolver.resolve("Union (Socket x Socket)", "2").unwrap(), Ratio::new(11, 8));
}

#[test]
fn override_file_errors_are_input_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert_eq!(read_overrides_json(&missing).unwrap_err().exit_code(), 2);
}

#[test]
fn fraction_rendering_matches_documented_values() {
    assert_eq!(to_sixteenths_fraction(&Ratio::new(5, 2)), "2 1/2");
    assert_eq!(to_sixteenths_fraction(&Ratio::new(37, 16)), "2 5/16");
    assert_eq!(to_sixteenths_fraction(&Ratio::from_integer(3)), "3");
}

#[test]
fn every_shipped_catalog_row_resolves_by_raw_and_normalized_size() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.csv");
    let config = CatalogConfig::default();
    let loaded = load_catalog(&path, &config).unwrap();
    assert!(loaded.row_errors.is_empty());

    let catalog = &loaded.catalog;
    let duplicates = catalog.duplicates();
    let resolver = Resolver::new(catalog, &config);
    let mut checked = 0;
    for entry in catalog.entries() {
        if duplicates.iter().any(|d| std::ptr::eq(*d, entry)) {
            continue;
        }
        let expected = entry.primary();
        assert!(expected.is_ok(), "{} size {}", entry.fitting_type, entry.size);
        assert_eq!(resolver.resolve(&entry.fitting_type, &entry.size), expected);
        assert_eq!(
            resolver.resolve(&entry.fitting_type, &normalize_size(&entry.size)),
            expected,
            "{} size {}",
            entry.fitting_type,
            entry.size
        );
        checked += 1;
    }
    assert_eq!(checked, catalog.len() - duplicates.len());
    assert!(checked > 0);
}

#[test]
fn oversized_inputs_are_rejected_before_calculating() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = dir.path().join("overrides.json");
    fs::write(
        &overrides,
        r#"[{"fitting_type": "Elbow 90(Socket x Socket)", "size": "2", "primary": "1/999999929"}]"#,
    )
    .unwrap();
    assert_eq!(read_overrides_json(&overrides).unwrap_err().exit_code(), 2);

    for raw in ["100000000000000000", "12 1/999999937"] {
        let err: AppError = parse_measurement("center-to-center", raw).unwrap_err().into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains(raw));
    }
}
