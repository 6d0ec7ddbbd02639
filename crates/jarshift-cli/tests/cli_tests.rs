//! Integration tests for jarshift-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn jarshift_cmd() -> Command {
    cargo_bin_cmd!("jarshift")
}

fn jar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    fs::write(path, jar_bytes(entries)).unwrap();
}

fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn entry_text(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn test_version_flag() {
    jarshift_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jarshift"));
}

#[test]
fn test_migrate_help() {
    jarshift_cmd()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--rule"));
}

#[test]
fn test_migrate_renames_entries() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.jar");
    let dest = temp.path().join("app-migrated.jar");
    write_jar(
        &source,
        &[
            ("javax/servlet/Filter.class", b"\xCA\xFE\xBA\xBE"),
            ("WEB-INF/web.xml", b"<filter>javax.servlet.Filter</filter>"),
            ("com/acme/App.class", b"\xCA\xFE"),
        ],
    );

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("was transformed to"));

    assert_eq!(
        entry_names(&dest),
        vec![
            "jakarta/servlet/Filter.class",
            "WEB-INF/web.xml",
            "com/acme/App.class"
        ]
    );
    assert_eq!(
        entry_text(&dest, "WEB-INF/web.xml"),
        "<filter>jakarta.servlet.Filter</filter>"
    );
}

#[test]
fn test_migrate_without_matches_reports_copy() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("plain.jar");
    let dest = temp.path().join("plain-out.jar");
    write_jar(&source, &[("com/acme/App.class", b"\xCA\xFE")]);

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("no rule applicable"));

    assert_eq!(entry_names(&dest), vec!["com/acme/App.class"]);
}

#[test]
fn test_migrate_refuses_existing_dest_without_force() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.jar");
    let dest = temp.path().join("out.jar");
    write_jar(&source, &[("javax/servlet/Filter.class", b"\xCA\xFE")]);
    fs::write(&dest, b"keep me").unwrap();

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read(&dest).unwrap(), b"keep me");

    jarshift_cmd()
        .args(["migrate", "-f", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success();

    assert_eq!(entry_names(&dest), vec!["jakarta/servlet/Filter.class"]);
}

#[test]
fn test_migrate_json_output() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.jar");
    let dest = temp.path().join("out.jar");
    write_jar(&source, &[("javax/servlet/Filter.class", b"\xCA\xFE")]);

    let output = jarshift_cmd()
        .args(["--json", "migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "migrate");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["changed"], true);
    assert_eq!(value["data"]["entries_renamed"], 1);
}

#[test]
fn test_migrate_invalid_rule() {
    let temp = TempDir::new().unwrap();

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet"])
        .arg(temp.path().join("a.jar"))
        .arg(temp.path().join("b.jar"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("FROM=TO"));
}

#[test]
fn test_migrate_rule_required() {
    jarshift_cmd()
        .args(["migrate", "a.jar", "b.jar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rule"));
}

#[test]
fn test_migrate_corrupt_archive() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("broken.jar");
    fs::write(&source, b"definitely not a zip").unwrap();

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(temp.path().join("out.jar"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.jar"));
}

#[test]
fn test_migrate_directory_tree() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    fs::create_dir_all(source.join("lib")).unwrap();
    write_jar(
        &source.join("lib/servlet.jar"),
        &[("javax/servlet/Filter.class", b"\xCA\xFE")],
    );
    fs::write(source.join("app.properties"), b"filter=javax.servlet.Filter").unwrap();
    fs::write(source.join("README"), b"unchanged").unwrap();

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transformed"));

    assert_eq!(
        entry_names(&dest.join("lib/servlet.jar")),
        vec!["jakarta/servlet/Filter.class"]
    );
    assert_eq!(
        fs::read_to_string(dest.join("app.properties")).unwrap(),
        "filter=jakarta.servlet.Filter"
    );
    assert_eq!(fs::read(dest.join("README")).unwrap(), b"unchanged");
}

#[test]
fn test_migrate_directory_refuses_non_empty_dest_without_force() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&dest).unwrap();
    fs::write(source.join("app.properties"), b"filter=javax.servlet.Filter").unwrap();
    fs::write(dest.join("app.properties"), b"keep me").unwrap();

    jarshift_cmd()
        .args(["migrate", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read(dest.join("app.properties")).unwrap(), b"keep me");

    jarshift_cmd()
        .args(["migrate", "--force", "-r", "javax.servlet=jakarta.servlet"])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dest.join("app.properties")).unwrap(),
        "filter=jakarta.servlet.Filter"
    );
}

#[test]
fn test_migrate_nested_archive() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.war");
    let dest = temp.path().join("app-out.war");
    let inner = jar_bytes(&[("javax/servlet/Filter.class", b"\xCA\xFE")]);
    write_jar(
        &source,
        &[
            ("WEB-INF/lib/inner.jar", &inner),
            ("index.html", b"<html></html>"),
        ],
    );

    jarshift_cmd()
        .args([
            "migrate",
            "--rewrite-nested",
            "-r",
            "javax.servlet=jakarta.servlet",
        ])
        .arg(&source)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("was transformed to"));

    let mut outer = ZipArchive::new(fs::File::open(&dest).unwrap()).unwrap();
    let mut nested = Vec::new();
    outer
        .by_name("WEB-INF/lib/inner.jar")
        .unwrap()
        .read_to_end(&mut nested)
        .unwrap();
    let inner_archive = ZipArchive::new(Cursor::new(nested)).unwrap();
    assert_eq!(
        inner_archive.file_names().collect::<Vec<_>>(),
        vec!["jakarta/servlet/Filter.class"]
    );
}

#[test]
fn test_scan_lists_nested_classes() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.war");
    let inner = jar_bytes(&[("com/acme/Inner.class", b"\xCA\xFE\xBA\xBE")]);
    write_jar(
        &source,
        &[
            ("WEB-INF/classes/com/acme/Outer.class", b"\xCA\xFE"),
            ("WEB-INF/lib/inner.jar", &inner),
        ],
    );

    jarshift_cmd()
        .args(["scan", "--in-memory"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("WEB-INF/classes/com/acme/Outer.class"))
        .stdout(predicate::str::contains("com/acme/Inner.class"))
        .stdout(predicate::str::contains("Total: 2 classes"));

    assert!(!temp.path().join("WEB-INF").exists());
}

#[test]
fn test_scan_extracts_nested_next_to_archive() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("app.war");
    let inner = jar_bytes(&[("com/acme/Inner.class", b"\xCA\xFE")]);
    write_jar(&source, &[("WEB-INF/lib/inner.jar", &inner)]);

    jarshift_cmd()
        .args(["--json", "scan"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nested_extracted\": 1"));

    assert!(temp.path().join("WEB-INF/lib/inner.jar").is_file());

    jarshift_cmd()
        .args(["--json", "scan"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nested_reused\": 1"));
}

#[test]
fn test_scan_missing_archive() {
    jarshift_cmd()
        .args(["scan", "/nonexistent/app.jar"])
        .assert()
        .failure();
}

#[test]
fn test_completion_bash() {
    jarshift_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jarshift"));
}
