//! Transform command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use carelink_core::{OffsetGuesser, Recency, TransformOptions, Transformer};

use crate::cli::{OutputFormat, TransformArgs};
use crate::config::{Config, resolve_format, resolve_sgv_limit};
use crate::format::{FormatOptions, format_entries_json, format_entries_text};
use crate::util::{load_snapshot, write_output};

pub fn cmd_transform(args: &TransformArgs, output: Option<&PathBuf>, config: &Config) -> Result<()> {
    let snapshot = load_snapshot(args.input.input.as_deref())?;

    let sgv_limit = resolve_sgv_limit(args.sgv_limit, config);
    let transformer = Transformer::new(
        Arc::new(OffsetGuesser::new()),
        TransformOptions::default().sgv_limit(sgv_limit),
    );
    let entries = transformer.transform(&snapshot);

    if entries.is_empty() {
        tracing::info!("Snapshot is stale, no entries emitted");
    }

    let opts = FormatOptions::default().with_compact(args.compact || config.compact);
    let content = match resolve_format(args.format, config) {
        OutputFormat::Json => format_entries_json(&entries, args.extra.as_ref(), &opts)?,
        OutputFormat::Text => format_entries_text(&entries, Recency::of(&snapshot)),
    };

    write_output(output, &content)
}
