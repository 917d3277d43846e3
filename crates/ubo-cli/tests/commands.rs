//! # Subcommand Tests
//!
//! Runs the `validate` and `render` handlers against the core fixture
//! directory and against broken copies of it.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;

use ubo_cli::render::{run_render, RenderArgs};
use ubo_cli::validate::{run_validate, ValidateArgs};
use ubo_cli::SourceArgs;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../ubo-core/tests/fixtures")
}

fn source(dir: &Path) -> SourceArgs {
    SourceArgs {
        data_dir: dir.to_path_buf(),
        geo: None,
        registry: None,
    }
}

fn render_args(category: Option<usize>) -> RenderArgs {
    RenderArgs {
        source: source(&fixtures()),
        category,
        placeholder: category.is_none(),
        pretty: false,
    }
}

#[test]
fn validate_accepts_fixture() {
    let mut out = Vec::new();
    let args = ValidateArgs {
        source: source(&fixtures()),
        strict_geo: true,
    };
    assert_eq!(run_validate(&args, &mut out).unwrap(), 0);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "OK: 7 categories, 6 countries, 0 faults\n");
}

#[test]
fn validate_reports_unmapped_value() {
    let dir = tempfile::tempdir().unwrap();
    let results = std::fs::read_to_string(fixtures().join("ubo_atlas_data.csv"))
        .unwrap()
        .replace("Latvia,LVA,implemented,public,no,", "Latvia,LVA,implemented,public,free,");
    std::fs::write(dir.path().join("ubo_atlas_data.csv"), results).unwrap();
    for name in ["ubo_atlas_data_fields.csv", "custom.geo-50m-europe41.json"] {
        std::fs::copy(fixtures().join(name), dir.path().join(name)).unwrap();
    }

    let mut out = Vec::new();
    let args = ValidateArgs {
        source: source(dir.path()),
        strict_geo: false,
    };
    assert_eq!(run_validate(&args, &mut out).unwrap(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("FAIL"));
    assert!(text.contains("Latvia"));
    assert!(text.contains("INVALID: 7 categories, 6 countries, 1 faults"));
}

#[test]
fn validate_errors_on_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let args = ValidateArgs {
        source: source(&dir.path().join("absent")),
        strict_geo: false,
    };
    let err = run_validate(&args, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("loading atlas"));
}

#[test]
fn render_prints_category_figure() {
    let mut out = Vec::new();
    assert_eq!(run_render(&render_args(Some(0)), &mut out).unwrap(), 0);
    let figure: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(figure["data"][0]["type"], "choropleth");
    assert_eq!(figure["data"][0]["z"].as_array().unwrap().len(), 6);
}

#[test]
fn render_prints_placeholder() {
    let mut out = Vec::new();
    run_render(&render_args(None), &mut out).unwrap();
    let figure: Value = serde_json::from_slice(&out).unwrap();
    assert!(figure["data"][0].get("z").is_none());
    assert!(figure["layout"]["annotations"][0]["text"].is_string());
}

#[test]
fn render_rejects_out_of_range_category() {
    let err = run_render(&render_args(Some(7)), &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("rendering category 7"));
}

#[derive(Parser, Debug)]
struct RenderCli {
    #[command(flatten)]
    args: RenderArgs,
}

#[test]
fn render_requires_a_target() {
    assert!(RenderCli::try_parse_from(["ubo", "--data-dir", "data"]).is_err());
    let parsed = RenderCli::try_parse_from(["ubo", "--category", "2", "--pretty"]).unwrap();
    assert_eq!(parsed.args.category, Some(2));
    assert!(parsed.args.pretty);
    assert_eq!(parsed.args.source.data_dir, PathBuf::from("data"));
}
