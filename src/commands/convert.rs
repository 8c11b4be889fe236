//! Convert subcommand handler

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tsr::{Document, Format};

/// Re-encode a document as JSON or NDJSON.
///
/// Writes to `output` when given, otherwise to stdout.
pub fn handle(file: &Path, to: Format, output: Option<&Path>) -> Result<()> {
    let doc = Document::parse(file)?;

    match output {
        Some(path) => {
            let out = fs::File::create(path)
                .with_context(|| format!("Failed to create file: {:?}", path))?;
            let mut writer = BufWriter::new(out);
            doc.write_as(&mut writer, to)?;
            writer.flush()?;
            tracing::info!(from = %file.display(), to = %path.display(), format = %to, "converted");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            doc.write_as(&mut writer, to)?;
            writer.flush()?;
        }
    }
    Ok(())
}
