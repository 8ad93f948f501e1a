//! Report rendering and transcript export.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::turn::Turn;
use crate::orchestrator::ConversationSummary;

pub const DEFAULT_REPORT_TITLE: &str = "Agentic AI Conversation Summary";

/// Renders a conversation summary into a downloadable document.
pub trait ReportRenderer {
    /// Render `summary` under `title`, returning the encoded document bytes.
    fn render(&self, title: &str, summary: &ConversationSummary) -> Result<Vec<u8>>;

    /// Suggested file extension, without the dot.
    fn extension(&self) -> &'static str;
}

/// Markdown document with a short and a detailed section.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReport;

impl ReportRenderer for MarkdownReport {
    fn render(&self, title: &str, summary: &ConversationSummary) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        writeln!(out, "# {}", title)?;
        writeln!(out)?;
        writeln!(out, "## Short Summary")?;
        writeln!(out)?;
        writeln!(out, "{}", summary.short.trim_end())?;
        writeln!(out)?;
        writeln!(out, "## Detailed FAQ Summary")?;
        writeln!(out)?;
        writeln!(out, "{}", summary.long.trim_end())?;
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

/// On-disk transcript layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializableTranscript {
    pub metadata: HashMap<String, String>,
    pub turns: Vec<Turn>,
}

/// Write `turns` to `path` as JSON with a format version tag.
pub fn write_transcript_json(turns: &[Turn], path: &Path) -> Result<()> {
    let mut metadata = HashMap::new();
    metadata.insert("format_version".to_string(), "agent-duet-1".to_string());
    metadata.insert("turns".to_string(), turns.len().to_string());

    let serial = SerializableTranscript {
        metadata,
        turns: turns.to_vec(),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &serial)?;
    writer.flush()?;
    Ok(())
}
