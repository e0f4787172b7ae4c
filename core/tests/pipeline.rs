use codepack_core::emit::STRUCTURE_LABEL;
use codepack_core::{
    AppError, Config, FlatListing, NullReporter, TreeCommand, run, run_with_categories,
    split_blocks,
};
use std::fs;
use std::path::{Path, PathBuf};

fn test_config(output_dir: &str) -> Config {
    Config {
        output_dir: Some(PathBuf::from(output_dir)),
        ..Config::default()
    }
}

/// Lay out a miniature copy of the chat-bot project the category table
/// was written for.
fn populate_bot_project(root: &Path) {
    fs::write(root.join("config.py"), b"TOKEN = \"abc\"\n").unwrap();
    fs::write(root.join("requirements.txt"), b"python-telegram-bot\n").unwrap();
    fs::write(root.join("bot.py"), b"def main():\n    pass\n").unwrap();
    fs::write(root.join("ai_client.py"), b"class Client:\n    pass\n").unwrap();
    fs::create_dir_all(root.join("src/app")).unwrap();
    fs::write(root.join("src/app/handlers.py"), b"HANDLERS = []\n").unwrap();
    fs::create_dir(root.join("tests")).unwrap();
    fs::write(root.join("tests/test_bot.py"), b"def test_ok():\n    assert True\n").unwrap();
    fs::create_dir(root.join("scripts")).unwrap();
    fs::write(root.join("scripts/deploy.sh"), b"#!/bin/sh\necho deploy\n").unwrap();
    fs::write(root.join("scripts/backfill.py"), b"print(\"backfill\")\n").unwrap();
    fs::write(root.join("schema.sql"), b"CREATE TABLE messages (id int);\n").unwrap();
    fs::write(root.join("Dockerfile"), b"FROM python:3.12\n").unwrap();
    fs::write(root.join("fly.toml"), b"app = \"bot\"\n").unwrap();
}

fn single_artifact_in(dir: &Path) -> PathBuf {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one artifact in {:?}", dir);
    entries.pop().unwrap()
}

#[test]
fn graceful_absence_still_reaches_complete() {
    let project = tempfile::tempdir().unwrap();
    let config = test_config("out");
    let summary = run(project.path(), &config, &FlatListing, &NullReporter).unwrap();

    assert_eq!(summary.files_emitted, 0);
    assert!(summary.skipped > 0);
    let document = fs::read(&summary.artifact_path).unwrap();
    let text = String::from_utf8_lossy(&document);
    assert!(text.contains("GOAL"));
    assert!(text.contains(STRUCTURE_LABEL));
    assert!(split_blocks(&document).is_empty());
}

#[test]
fn categories_emit_in_declared_order_with_sorted_scans() {
    let project = tempfile::tempdir().unwrap();
    populate_bot_project(project.path());
    let config = test_config("out");
    let summary = run(project.path(), &config, &FlatListing, &NullReporter).unwrap();

    let document = fs::read(&summary.artifact_path).unwrap();
    let paths: Vec<String> = split_blocks(&document).into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        paths,
        vec![
            // core configuration (fixed, declared order)
            "config.py",
            "requirements.txt",
            // root sources (flat scan, lexicographic)
            "ai_client.py",
            "bot.py",
            "config.py",
            // src sources
            "src/app/handlers.py",
            // tests
            "tests/test_bot.py",
            // scripts (two extension families, lexicographic)
            "scripts/backfill.py",
            "scripts/deploy.sh",
            // database schema
            "schema.sql",
            // deployment (fixed, declared order)
            "Dockerfile",
            "fly.toml",
        ]
    );
    assert_eq!(summary.files_emitted, paths.len());
    // .env.example, supabase/schema.sql, migrations.sql,
    // docker-compose.yml, Procfile
    assert_eq!(summary.skipped, 5);
}

#[test]
fn document_round_trips_to_on_disk_bytes() {
    let project = tempfile::tempdir().unwrap();
    populate_bot_project(project.path());
    let config = test_config("out");
    let summary = run(project.path(), &config, &FlatListing, &NullReporter).unwrap();

    let document = fs::read(&summary.artifact_path).unwrap();
    for (path, content) in split_blocks(&document) {
        let on_disk = fs::read(project.path().join(&path)).unwrap();
        assert_eq!(content, on_disk, "content drift for {}", path);
    }
}

#[test]
fn reporter_choice_never_changes_artifact_bytes() {
    let project = tempfile::tempdir().unwrap();
    populate_bot_project(project.path());
    // Both output directories exist up front so the structure snapshot is
    // identical for the two runs.
    fs::create_dir(project.path().join("out1")).unwrap();
    fs::create_dir(project.path().join("out2")).unwrap();

    let silent = run(
        project.path(),
        &test_config("out1"),
        &FlatListing,
        &NullReporter,
    )
    .unwrap();
    let reported = run(
        project.path(),
        &test_config("out2"),
        &FlatListing,
        &codepack_core::ConsoleReporter,
    )
    .unwrap();

    let body_a = fs::read(&silent.artifact_path).unwrap();
    let body_b = fs::read(&reported.artifact_path).unwrap();
    assert_eq!(body_a, body_b);
}

#[test]
fn unwritable_destination_aborts_and_spares_prior_artifacts() {
    let project = tempfile::tempdir().unwrap();
    populate_bot_project(project.path());

    let good = run(
        project.path(),
        &test_config("out"),
        &FlatListing,
        &NullReporter,
    )
    .unwrap();
    let good_bytes = fs::read(&good.artifact_path).unwrap();

    // A regular file where the output directory should be makes artifact
    // creation fail regardless of the user the tests run as.
    fs::write(project.path().join("blocker"), b"in the way").unwrap();
    let err = run(
        project.path(),
        &test_config("blocker/nested"),
        &FlatListing,
        &NullReporter,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::ArtifactWrite { .. }));

    let artifact = single_artifact_in(&project.path().join("out"));
    assert_eq!(fs::read(artifact).unwrap(), good_bytes);
}

#[test]
fn missing_tree_binary_falls_back_to_flat_listing() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join("config.py"), b"X = 1\n").unwrap();
    let config = test_config("out");
    let renderer = TreeCommand::with_command("codepack-no-such-tree-binary");
    let summary =
        run_with_categories(project.path(), &config, &[], &renderer, &NullReporter).unwrap();

    let text = fs::read_to_string(&summary.artifact_path).unwrap();
    assert!(text.contains(STRUCTURE_LABEL));
    assert!(text.contains("config.py\n"));
}
