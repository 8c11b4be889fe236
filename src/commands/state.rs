//! State subcommand handler

use anyhow::Result;
use std::path::Path;

use tsr::player::{find_event_index_at_time, render};
use tsr::{reconstruct, Document};

/// Print the editor state after the whole session, or at `at` ms.
pub fn handle(file: &Path, at: Option<u64>, annotate: bool) -> Result<()> {
    let doc = Document::parse(file)?;

    let end = match at {
        Some(time) => find_event_index_at_time(&doc.events, time).map_or(0, |i| i + 1),
        None => doc.events.len(),
    };
    let state = reconstruct(&doc.initial_text, &doc.events[..end]);
    tracing::debug!(applied = end, "reconstructed state");

    if annotate {
        println!("{}", render::annotate_text_state(&state));
    } else {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}
