//! Command-line interface for turning CareLink snapshots into Nightscout entries.
//!
//! The `carelink` binary reads one CareLink "connect" snapshot document from
//! a file or stdin, runs it through [`carelink_core`] and prints the
//! resulting entries.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `transform` | Print the Nightscout entries for a snapshot |
//! | `offset` | Print the inferred pump timezone offset |
//! | `config` | Manage CLI configuration (`path`, `show`, `init`) |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **JSON** (default): the entries as a JSON array, ready to upload
//! - **Text**: a table for eyeballing a snapshot
//!
//! # Configuration
//!
//! The CLI reads `~/.config/carelink/config.toml` (or platform equivalent):
//!
//! - `sgv_limit`: Keep only this many of the latest glucose entries
//! - `format`: Default output format (`json` or `text`)
//! - `compact`: Print compact JSON
//!
//! # Environment Variables
//!
//! - `CARELINK_SGV_LIMIT`: Default for `--sgv-limit` (overrides the config file)
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! Transform a saved snapshot, keeping the latest 12 glucose values:
//! ```bash
//! carelink transform snapshot.json --sgv-limit 12
//! ```
//!
//! Pipe a snapshot and tag every entry:
//! ```bash
//! curl -s "$CARELINK_URL" | carelink transform --extra '{"enteredBy": "carelink"}'
//! ```
//!
//! Check which timezone the pump clock is in:
//! ```bash
//! carelink offset snapshot.json --format text
//! ```

// This crate is primarily a binary CLI application; the commands live in
// main.rs. The library target only re-exports the crates it drives.

pub use carelink_core;
pub use carelink_types;
