//! Offset command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use carelink_core::OffsetGuesser;

use crate::cli::{InputArgs, OutputFormat};
use crate::config::{Config, resolve_format};
use crate::format::{FormatOptions, OffsetReport, format_offset_json, format_offset_text};
use crate::util::{load_snapshot, write_output};

pub fn cmd_offset(
    input: &InputArgs,
    format: Option<OutputFormat>,
    output: Option<&PathBuf>,
    config: &Config,
) -> Result<()> {
    let snapshot = load_snapshot(input.input.as_deref())?;

    let offset = OffsetGuesser::new()
        .guess_for(&snapshot)
        .with_context(|| {
            format!(
                "Failed to infer pump offset from sMedicalDeviceTime \"{}\"",
                snapshot.medical_device_time
            )
        })?;

    let report = OffsetReport::new(
        offset,
        &snapshot.medical_device_time,
        snapshot.current_server_time,
    );
    let opts = FormatOptions::default().with_compact(config.compact);
    let content = match resolve_format(format, config) {
        OutputFormat::Json => format_offset_json(&report, &opts)?,
        OutputFormat::Text => format_offset_text(&report),
    };

    write_output(output, &content)
}
