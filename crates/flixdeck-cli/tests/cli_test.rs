#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shows"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("random"));
}

#[test]
fn test_shows_help_lists_presets() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["shows", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tv-shows"));
}

#[test]
fn test_shows_unknown_preset() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["shows", "--preset", "podcasts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("podcasts"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_blank_query_is_rejected() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "search", "--query", "   "])
        .env("TMDB_TOKEN", "unused")
        .assert()
        .failure()
        .stderr(predicate::str::contains("search query must not be blank"));
}

#[test]
fn test_missing_token_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "random"])
        .env_remove("TMDB_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_TOKEN"));
}

#[test]
fn test_invalid_config_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[[sections]]\ntitle = \"Docs\"\nrequest_type = \"DOCUMENTARY\"\nmedia_type = \"movie\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "shows"])
        .env("TMDB_TOKEN", "unused")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_details_rejects_unknown_media_type() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["details", "--id", "603", "--media-type", "person"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown media type: person"));
}

#[test]
fn test_season_requires_season_number() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["season", "--id", "1399"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--season"));
}

#[test]
fn test_find_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("flixdeck");
    cmd.args(["find", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--path"));
}
