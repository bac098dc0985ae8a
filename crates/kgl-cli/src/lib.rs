//! # kgl-cli: CLI Tool for the KGL Produce Ledger
//!
//! Provides the `kgl` command-line interface.
//!
//! ## Subcommands
//!
//! - `kgl validate`: Check a procurement or sale payload offline.
//!
//! ```bash
//! kgl validate procurement payload.json
//! kgl validate credit-sale payload.json --json
//! ```

pub mod validate;
