//! Integration tests for document loading and encoding

use super::helpers::{fixture, load_fixture, temp_file};
use tsr::document::{EventKind, Format, TextChange};
use tsr::Document;

#[test]
fn json_fixture_loads() {
    let doc = load_fixture("typing.json");
    assert_eq!(doc.session.id, "demo-typing");
    assert_eq!(doc.initial_text, "Hi");
    assert_eq!(doc.events.len(), 15);
    assert_eq!(doc.duration(), 2000);
}

#[test]
fn ndjson_fixture_loads_by_extension() {
    let doc = load_fixture("session.ndjson");
    assert_eq!(doc.session.id, "demo-stream");
    assert_eq!(doc.initial_text, "abc");
    assert_eq!(doc.events.len(), 7);
    assert_eq!(Format::from_path(&fixture("session.ndjson")), Format::Ndjson);
}

#[test]
fn events_are_classified_at_load() {
    let doc = load_fixture("typing.json");
    match &doc.events[3].kind {
        EventKind::Input { change, .. } => {
            assert_eq!(change, &TextChange::Snapshot("Hi!".to_string()))
        }
        other => panic!("expected input, got {:?}", other),
    }
    match &doc.events[1].kind {
        EventKind::Key { modifiers, key, .. } => {
            assert!(modifiers.shift);
            assert_eq!(key, "!");
        }
        other => panic!("expected key, got {:?}", other),
    }
}

#[test]
fn unknown_events_survive_reencoding() {
    let doc = load_fixture("typing.json");
    let mut out = Vec::new();
    doc.write_as(&mut out, Format::Ndjson).unwrap();
    let text = String::from_utf8(out).unwrap();

    let pointer_line = text
        .lines()
        .find(|line| line.contains("pointermove"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(pointer_line).unwrap();
    assert_eq!(value["x"], 10);
    assert_eq!(value["y"], 20);
}

#[test]
fn unrecognized_events_reencode_verbatim() {
    let lines = [
        r#"{"version":"0.1","session":{"id":"x"}}"#,
        r#"{"type":"paste","time":5,"data":"xyz","text":"full","key":"v"}"#,
        r#"{"type":"selectionchange","time":6,"anchor":{"index":3}}"#,
        r#"{"type":"clipboard","time":7,"data":{"mime":"text/plain"},"pos":1}"#,
    ];
    let (_dir, path) = temp_file("odd.ndjson", &lines.join("\n"));
    let doc = Document::parse(&path).unwrap();

    let mut out = Vec::new();
    doc.write_as(&mut out, Format::Ndjson).unwrap();
    let written: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .skip(1)
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let expected: Vec<serde_json::Value> = lines[1..]
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(written, expected);
}

#[test]
fn conversion_preserves_document() {
    let doc = load_fixture("typing.json");
    let mut out = Vec::new();
    doc.write_as(&mut out, Format::Ndjson).unwrap();
    let (_dir, path) = temp_file("converted.jsonl", &String::from_utf8(out).unwrap());

    assert_eq!(Document::parse(&path).unwrap(), doc);
}

#[test]
fn markers_are_listed_in_order() {
    let doc = load_fixture("typing.json");
    let markers = doc.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].time, 500);
    assert_eq!(markers[0].label, "greeting-done");
}

#[test]
fn malformed_file_names_the_path() {
    let (_dir, path) = temp_file("broken.json", "{\"version\": \"0.1\", \"session\":");
    let err = Document::parse(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn missing_file_is_an_error() {
    assert!(Document::parse(fixture("does-not-exist.json")).is_err());
}
