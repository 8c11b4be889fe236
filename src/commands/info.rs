//! Info subcommand handler

use anyhow::Result;
use humansize::{format_size, DECIMAL};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tsr::player::render::format_duration;
use tsr::{reconstruct, Document};

/// Print session metadata, event counts per type, and markers.
pub fn handle(file: &Path) -> Result<()> {
    let doc = Document::parse(file)?;
    let size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    print!("{}", build_info(&doc, size));
    Ok(())
}

/// Format the info report for a parsed document of `size` bytes.
pub fn build_info(doc: &Document, size: u64) -> String {
    let mut out = String::new();
    let session = &doc.session;
    let final_state = reconstruct(&doc.initial_text, &doc.events);

    out.push_str(&format!("Session:   {}\n", session.id));
    for (label, value) in [
        ("Agent", &session.user_agent),
        ("Language", &session.lang),
        ("Device", &session.device),
        ("Source", &session.source),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("{:<10} {}\n", format!("{}:", label), value));
        }
    }
    out.push_str(&format!("Version:   {}\n", doc.version));
    out.push_str(&format!("Size:      {}\n", format_size(size, DECIMAL)));
    out.push_str(&format!(
        "Duration:  {} ({} ms)\n",
        format_duration(doc.duration()),
        doc.duration()
    ));
    out.push_str(&format!(
        "Text:      {} -> {} chars\n",
        doc.initial_text.chars().count(),
        final_state.len()
    ));
    out.push_str(&format!("Events:    {}\n", doc.events.len()));

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in &doc.events {
        *counts.entry(event.kind_name()).or_default() += 1;
    }
    for (kind, count) in counts {
        out.push_str(&format!("  {:<18} {}\n", kind, count));
    }

    let markers = doc.markers();
    if !markers.is_empty() {
        out.push_str(&format!("Markers:   {}\n", markers.len()));
        for marker in markers {
            out.push_str(&format!(
                "  {} {}\n",
                format_duration(marker.time),
                marker.label
            ));
        }
    }
    out
}
