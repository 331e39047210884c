use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    index: u64,
    size: usize,
    encoding: &'a str,
    payload: String,
}

/// Write one decoded message to `out`.
///
/// `index` is zero-based in stream order. Write failures are returned so the
/// caller can stop quietly when the reading end of a pipe goes away.
pub fn print_message<W: Write>(
    out: &mut W,
    index: u64,
    payload: &[u8],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", render_json(index, payload)),
        OutputFormat::Table => {
            let (encoding, preview) = payload_preview(payload);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "SIZE", "ENCODING", "PAYLOAD"])
                .add_row(vec![
                    index.to_string(),
                    payload.len().to_string(),
                    encoding.to_string(),
                    preview,
                ]);
            writeln!(out, "{table}")
        }
        OutputFormat::Pretty => {
            let (encoding, preview) = payload_preview(payload);
            writeln!(
                out,
                "message={} size={} {}={}",
                index,
                payload.len(),
                encoding,
                preview
            )
        }
        OutputFormat::Raw => {
            out.write_all(payload)?;
            out.flush()
        }
    }
}

fn render_json(index: u64, payload: &[u8]) -> String {
    let (encoding, preview) = payload_preview(payload);
    let out = MessageOutput {
        index,
        size: payload.len(),
        encoding,
        payload: preview,
    };
    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}

/// UTF-8 payloads are shown as text, anything else as lowercase hex.
fn payload_preview(payload: &[u8]) -> (&'static str, String) {
    match std::str::from_utf8(payload) {
        Ok(text) => ("utf8", text.to_string()),
        Err(_) => ("hex", hex::encode(payload)),
    }
}
