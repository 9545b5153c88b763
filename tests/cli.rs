mod common;

use assert_cmd::Command;
use common::Fixture;
use predicates::str::contains;
use serde_json::Value;

fn cmd(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("rusty-shelf").unwrap();
    cmd.arg("--books").arg(&fx.books).arg("--reviews").arg(&fx.reviews);
    cmd
}

#[test]
fn text_report_lists_rankings() {
    let fx = Fixture::new();
    cmd(&fx)
        .assert()
        .success()
        .stdout(contains("== Top 10 books by number of reviews =="))
        .stdout(contains("  1. A  3"))
        .stdout(contains("Total reviews: 6"));
}

#[test]
fn json_report_is_wrapped() {
    let fx = Fixture::new();
    let out = cmd(&fx)
        .args(["--json", "--top", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&out).expect("valid json output");

    assert_eq!(json["ok"], true);
    let rankings = json["data"]["rankings"].as_array().unwrap();
    assert_eq!(rankings[0]["kind"], "books_by_review_count");
    assert_eq!(rankings[0]["entries"][0]["key"], "A");
    assert_eq!(rankings[0]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["outliers"][0]["count"], 1);
}

#[test]
fn config_file_renames_columns() {
    let fx = Fixture::new();
    let config = fx.dir().join("shelf.json");
    std::fs::write(&config, r#"{ "columns": { "category": "genre" } }"#).unwrap();

    cmd(&fx)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("== Skipped =="))
        .stdout(contains("column 'genre' not found"));
}

#[test]
fn missing_input_fails_the_run() {
    let fx = Fixture::new();
    Command::cargo_bin("rusty-shelf")
        .unwrap()
        .arg("--books")
        .arg(fx.dir().join("absent.csv"))
        .arg("--reviews")
        .arg(&fx.reviews)
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn sample_generator_plants_dirty_rows() {
    use rusty_shelf::data::{clean::clean, loader::load};

    let out = tempfile::tempdir().unwrap();
    Command::cargo_bin("generate_sample")
        .unwrap()
        .arg(out.path())
        .assert()
        .success()
        .stdout(contains("Wrote 14 books"));

    let mut books = load(&out.path().join("books_data.csv")).unwrap();
    let summary = clean(&mut books);
    assert_eq!(summary.dropped_missing, 1);
    assert_eq!(summary.dropped_duplicates, 1);
    assert_eq!(summary.remaining, 12);

    let mut reviews = load(&out.path().join("books_rating.csv")).unwrap();
    let summary = clean(&mut reviews);
    assert_eq!(summary.dropped_missing, 1);
    assert!(summary.dropped_duplicates >= 1);

    let parquet = load(&out.path().join("books_rating.parquet")).unwrap();
    assert_eq!(parquet.columns, reviews.columns);
    assert_eq!(parquet.len(), summary.remaining + summary.dropped_duplicates - 1);
}
