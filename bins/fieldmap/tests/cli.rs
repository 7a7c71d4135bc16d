use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const SITES_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Field Sites</name>
    <Placemark>
      <name>Base Camp</name>
      <Point><coordinates>-122.4194,37.7749,0</coordinates></Point>
    </Placemark>
    <Folder>
      <name>Trails</name>
      <Placemark>
        <name>Ridge Trail</name>
        <LineString>
          <coordinates>-122.4194,37.7749 -122.4094,37.7849 -122.3994,37.7949</coordinates>
        </LineString>
      </Placemark>
    </Folder>
  </Document>
</kml>"#;

fn write_sites(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sites.kml");
    std::fs::write(&path, SITES_KML).unwrap();
    path
}

fn fieldmap(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fieldmap").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env_remove("FIELDMAP_CONFIG");
    cmd
}

#[test]
fn parse_prints_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    fieldmap(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Field Sites"))
        .stdout(predicate::str::contains("Trails/"))
        .stdout(predicate::str::contains("Ridge Trail [LineString]"));
}

#[test]
fn parse_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    let output = fieldmap(dir.path()).args(["parse", "--json"]).arg(&path).output().unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["name"], "Field Sites");
    assert_eq!(doc["folders"][0]["placemarks"][0]["name"], "Ridge Trail");
}

#[test]
fn analyze_json_reports_routes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    let output = fieldmap(dir.path()).args(["analyze", "--json"]).arg(&path).output().unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["totalPlacemarks"], 2);
    assert_eq!(stats["pointCount"], 1);
    assert_eq!(stats["routes"][0]["waypointCount"], 3);
    assert_eq!(stats["clusters"].as_array().unwrap().len(), 1);
}

#[test]
fn analyze_save_uses_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    fieldmap(dir.path())
        .args(["analyze", "--save"])
        .arg(&path)
        .assert()
        .success();

    assert!(dir.path().join("Field_Sites_analytics.json").exists());
}

#[test]
fn analyze_rejects_non_positive_distance() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    fieldmap(dir.path())
        .args(["analyze", "--max-distance-km", "0"])
        .arg(&path)
        .assert()
        .code(1);
}

#[test]
fn export_writes_geojson() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    fieldmap(dir.path())
        .arg("export")
        .arg(&path)
        .assert()
        .success();

    let body = std::fs::read_to_string(dir.path().join("Field_Sites.geojson")).unwrap();
    let collection: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(collection["features"][0]["geometry"]["type"], "Point");
    assert_eq!(
        collection["features"][0]["geometry"]["coordinates"],
        serde_json::json!([-122.4194, 37.7749, 0.0])
    );
}

#[test]
fn invalid_archive_exits_with_import_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.kmz");
    std::fs::write(&path, b"definitely not a zip").unwrap();

    fieldmap(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("E4001"));
}

#[test]
fn missing_explicit_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());

    fieldmap(dir.path())
        .args(["--config", "missing.toml", "parse"])
        .arg(&path)
        .assert()
        .code(3);
}

#[test]
fn config_file_sets_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sites(dir.path());
    std::fs::create_dir(dir.path().join("out")).unwrap();
    std::fs::write(
        dir.path().join(".fieldmap.toml"),
        "[general]\noutput_dir = \"out\"\npretty_json = false\n",
    )
    .unwrap();

    fieldmap(dir.path()).arg("export").arg(&path).assert().success();

    let body = std::fs::read_to_string(dir.path().join("out/Field_Sites.geojson")).unwrap();
    assert!(!body.contains('\n'));
}

#[test]
fn json_failures_are_reported_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.kmz");
    std::fs::write(&path, b"definitely not a zip").unwrap();

    let output = fieldmap(dir.path()).args(["parse", "--json"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let report: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(report["code"], "INVALID_ARCHIVE");
    assert_eq!(report["code_str"], "E4001");
    assert_eq!(report["category"], "Import");
    assert!(report["suggestion"].is_string());
}

#[test]
fn warns_when_no_placemarks_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.kml");
    std::fs::write(
        &path,
        "<kml><Document><name>Empty</name><Placemark><name>No geometry</name></Placemark></Document></kml>",
    )
    .unwrap();

    fieldmap(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("No placemarks with usable geometry found"));
}
