//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use carelink_core::{
    Entry, PumpOffset, PumpStatusEntry, Recency, SensorGlucoseEntry, Trend, overlay,
};
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

// ============================================================================
// Entry formatting
// ============================================================================

/// Format entries as a JSON array, merging `extra` into each one.
pub fn format_entries_json(
    entries: &[Entry],
    extra: Option<&Value>,
    opts: &FormatOptions,
) -> Result<String> {
    let documents = entries
        .iter()
        .map(|entry| -> Result<Value> { Ok(overlay(&serde_json::to_value(entry)?, extra)) })
        .collect::<Result<Vec<_>>>()?;
    opts.as_json(&documents)
}

/// Format entries as a table, or a notice when the snapshot was stale.
#[must_use]
pub fn format_entries_text(entries: &[Entry], recency: Recency) -> String {
    if entries.is_empty() {
        return format!(
            "No entries: CareLink data is {:.1} minutes old.\n",
            recency.minutes()
        );
    }

    let mut builder = Builder::default();
    builder.push_record(["Type", "Time", "Value", "Trend", "Device"]);
    for entry in entries {
        let (value, trend) = match entry {
            Entry::PumpStatus(status) => (summarize_pump_status(status), String::new()),
            Entry::SensorGlucose(sgv) => (format!("{} mg/dL", sgv.sgv), trend_label(sgv)),
        };
        builder.push_record([
            entry.kind().to_string(),
            entry
                .timestamp()
                .date_string
                .clone()
                .unwrap_or_else(|| entry.date().to_string()),
            value,
            trend,
            entry.device().to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    let glucose = entries.iter().filter(|e| e.as_sensor_glucose().is_some()).count();
    format!(
        "{}\n{} entries ({} glucose), data {:.1} minutes old\n",
        table,
        entries.len(),
        glucose,
        recency.minutes()
    )
}

fn summarize_pump_status(status: &PumpStatusEntry) -> String {
    let mut parts = Vec::new();
    if let Some(iob) = status.iob.as_ref().and_then(|n| n.as_f64()) {
        parts.push(format!("IOB {:.2} U", iob));
    }
    if let Some(amount) = status.reservoir_amount.as_ref().and_then(|n| n.as_f64()) {
        parts.push(format!("reservoir {:.1} U", amount));
    }
    if let Some(level) = &status.medical_device_battery_level_percent {
        parts.push(format!("battery {}%", level));
    }
    if status.medical_device_suspended == Some(true) {
        parts.push("suspended".to_string());
    }
    if let Some(state) = &status.sensor_state {
        parts.push(format!("sensor {}", state));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn trend_label(sgv: &SensorGlucoseEntry) -> String {
    match &sgv.trend {
        Some(annotation) => match Trend::from_code(annotation.trend) {
            Some(trend) => format!("{} {}", trend, annotation.direction),
            None => annotation.direction.clone(),
        },
        None => String::new(),
    }
}

// ============================================================================
// Offset formatting
// ============================================================================

/// Inferred offset as reported by the `offset` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetReport<'a> {
    pub offset: String,
    pub hours: i8,
    pub pump_time: &'a str,
    pub server_time: i64,
}

impl<'a> OffsetReport<'a> {
    pub fn new(offset: PumpOffset, pump_time: &'a str, server_time: i64) -> Self {
        Self {
            offset: offset.to_string(),
            hours: offset.hours(),
            pump_time,
            server_time,
        }
    }
}

#[must_use]
pub fn format_offset_text(report: &OffsetReport<'_>) -> String {
    format!(
        "Pump offset: {} (pump time: \"{}\", server time: {})\n",
        report.offset, report.pump_time, report.server_time
    )
}

pub fn format_offset_json(report: &OffsetReport<'_>, opts: &FormatOptions) -> Result<String> {
    opts.as_json(report)
}
