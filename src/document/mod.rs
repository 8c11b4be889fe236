//! Recorded session documents.
//!
//! A document is the immutable record of one editing session: session
//! metadata, the initial text, and the ordered event log. Two encodings are
//! supported:
//!
//! - **JSON**: one object `{version, session, initial_text, events}`
//! - **NDJSON** (streaming): a header line `{version, session, initial_text?}`
//!   followed by one event per line
//!
//! Loading is all-or-nothing: any malformed line fails the whole parse.

mod event;

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub use event::{
    Affinity, CompositionPhase, Delta, Event, EventKind, InputPhase, KeyPhase, Modifiers,
    SelectionPoint, TextChange,
};

/// The only document version this crate reads and writes.
pub const FORMAT_VERSION: &str = "0.1";

/// On-disk encoding of a document.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Json,
    Ndjson,
}

impl Format {
    /// Pick a format from a file extension (`.jsonl`/`.ndjson` are streaming).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("ndjson") => Format::Ndjson,
            _ => Format::Json,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Ndjson => write!(f, "ndjson"),
        }
    }
}

/// Metadata about the recording environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// A complete recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub session: Session,
    #[serde(default)]
    pub initial_text: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// First line of the streaming encoding.
#[derive(Debug, Serialize, Deserialize)]
struct StreamHeader {
    version: String,
    session: Session,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    initial_text: String,
}

/// A marker and its position on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPosition {
    /// Milliseconds from session start
    pub time: u64,
    pub label: String,
}

impl Document {
    pub fn new(session: Session, initial_text: impl Into<String>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            session,
            initial_text: initial_text.into(),
            events: Vec::new(),
        }
    }

    /// Parse a document from a path, choosing the encoding by extension.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            fs::File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let reader = BufReader::new(file);

        let doc = match Format::from_path(path) {
            Format::Ndjson => Self::parse_ndjson_reader(reader),
            Format::Json => Self::parse_json_reader(reader),
        }
        .with_context(|| format!("Failed to load document: {:?}", path))?;

        tracing::debug!(
            path = %path.display(),
            events = doc.events.len(),
            duration_ms = doc.duration(),
            "loaded document"
        );
        Ok(doc)
    }

    /// Parse the single-object JSON encoding.
    pub fn parse_json_str(content: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(content).context("Failed to parse document")?;
        check_version(&doc.version)?;
        Ok(doc)
    }

    fn parse_json_reader<R: BufRead>(reader: R) -> Result<Self> {
        let doc: Document =
            serde_json::from_reader(reader).context("Failed to parse document")?;
        check_version(&doc.version)?;
        Ok(doc)
    }

    /// Parse the streaming encoding from a reader.
    pub fn parse_ndjson_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .context("File is empty")?
            .context("Failed to read header line")?;

        let header: StreamHeader =
            serde_json::from_str(&header_line).context("Failed to parse header")?;
        check_version(&header.version)?;

        let mut events = Vec::new();
        for (line_num, line_result) in lines.enumerate() {
            let line =
                line_result.with_context(|| format!("Failed to read line {}", line_num + 2))?;

            if line.trim().is_empty() {
                continue;
            }

            let event: Event = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse event on line {}", line_num + 2))?;
            events.push(event);
        }

        Ok(Document {
            version: header.version,
            session: header.session,
            initial_text: header.initial_text,
            events,
        })
    }

    pub fn parse_ndjson_str(content: &str) -> Result<Self> {
        Self::parse_ndjson_reader(BufReader::new(content.as_bytes()))
    }

    /// Write the document to a path, choosing the encoding by extension.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file =
            fs::File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;

        self.write_as(&mut file, Format::from_path(path))
    }

    pub fn write_as<W: Write>(&self, writer: &mut W, format: Format) -> Result<()> {
        match format {
            Format::Json => self.write_json_to(writer),
            Format::Ndjson => self.write_ndjson_to(writer),
        }
    }

    pub fn write_json_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self).context("Failed to serialize document")?;
        writeln!(writer)?;
        Ok(())
    }

    pub fn write_ndjson_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let header = StreamHeader {
            version: self.version.clone(),
            session: self.session.clone(),
            initial_text: self.initial_text.clone(),
        };
        let header_json = serde_json::to_string(&header).context("Failed to serialize header")?;
        writeln!(writer, "{}", header_json)?;

        for event in &self.events {
            let line = serde_json::to_string(event).context("Failed to serialize event")?;
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }

    /// Time of the last event, or 0 for an empty log.
    pub fn duration(&self) -> u64 {
        self.events.last().map(|e| e.time).unwrap_or(0)
    }

    /// Collect `custom` events as timeline markers.
    pub fn markers(&self) -> Vec<MarkerPosition> {
        self.events
            .iter()
            .filter_map(|event| match &event.kind {
                EventKind::Custom { label, .. } => Some(MarkerPosition {
                    time: event.time,
                    label: label.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

fn check_version(version: &str) -> Result<()> {
    if version != FORMAT_VERSION {
        bail!(
            "Only document version {} is supported (got version {})",
            FORMAT_VERSION,
            version
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "version": "0.1",
            "session": {"id": "s1", "user_agent": "test", "lang": "en", "device": "desktop", "source": "textarea"},
            "initial_text": "",
            "events": [
                {"time": 0, "type": "input", "inputType": "insertText", "data": "h", "text": "h", "pos": 1},
                {"time": 100, "type": "input", "inputType": "insertText", "data": "i", "text": "hi", "pos": 2}
            ]
        }"#
    }

    fn sample_ndjson() -> &'static str {
        r#"{"version":"0.1","session":{"id":"s2","user_agent":"ua","lang":"ja","device":"laptop","source":"input"}}
{"time":0,"type":"focus"}
{"time":40,"type":"compositionstart","data":"k"}

{"time":90,"type":"custom","label":"checkpoint"}
{"time":120,"type":"compositionend","data":"か"}"#
    }

    #[test]
    fn parse_json_document() {
        let doc = Document::parse_json_str(sample_json()).unwrap();
        assert_eq!(doc.version, "0.1");
        assert_eq!(doc.session.id, "s1");
        assert_eq!(doc.events.len(), 2);
        assert_eq!(doc.duration(), 100);
    }

    #[test]
    fn parse_ndjson_skips_blank_lines() {
        let doc = Document::parse_ndjson_str(sample_ndjson()).unwrap();
        assert_eq!(doc.session.lang, "ja");
        assert_eq!(doc.initial_text, "");
        assert_eq!(doc.events.len(), 4);
        assert_eq!(doc.duration(), 120);
    }

    #[test]
    fn ndjson_error_reports_line_number() {
        let content = "{\"version\":\"0.1\",\"session\":{\"id\":\"x\"}}\n{\"time\":0,\"type\":\"focus\"}\nnot json";
        let err = Document::parse_ndjson_str(content).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn rejects_other_versions() {
        let content = r#"{"version":"2","session":{"id":"x"},"initial_text":"","events":[]}"#;
        let err = Document::parse_json_str(content).unwrap_err();
        assert!(err.to_string().contains("0.1"));
    }

    #[test]
    fn empty_ndjson_is_an_error() {
        assert!(Document::parse_ndjson_str("").is_err());
    }

    #[test]
    fn markers_come_from_custom_events() {
        let doc = Document::parse_ndjson_str(sample_ndjson()).unwrap();
        let markers = doc.markers();
        assert_eq!(
            markers,
            vec![MarkerPosition {
                time: 90,
                label: "checkpoint".to_string()
            }]
        );
    }

    #[test]
    fn empty_document_has_zero_duration() {
        let doc = Document::new(Session::default(), "seed");
        assert_eq!(doc.duration(), 0);
        assert!(doc.markers().is_empty());
    }

    #[test]
    fn json_written_document_reads_back_as_ndjson_equivalent() {
        let doc = Document::parse_json_str(sample_json()).unwrap();

        let mut ndjson = Vec::new();
        doc.write_ndjson_to(&mut ndjson).unwrap();
        let from_stream = Document::parse_ndjson_str(&String::from_utf8(ndjson).unwrap()).unwrap();

        assert_eq!(from_stream, doc);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.ndjson")), Format::Ndjson);
        assert_eq!(Format::from_path(Path::new("a.jsonl")), Format::Ndjson);
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a")), Format::Json);
    }
}
