//! WINC Root Certificate Store Inspector
//!
//! Loads flash images of the root certificate store kept by WINC Wi-Fi
//! modules and renders the decoded entries as a serial-console style dump
//! or a JSON report. Decoding itself lives in the `rootcert-format` crate.

pub mod config;
pub mod dump;
pub mod exit;
pub mod image;
pub mod inspect;
pub mod report;

pub use config::{CliOverrides, ConfigError, DumpConfig, OutputFormat};
pub use exit::ExitCode;
pub use image::{FlashImage, ImageError};
pub use inspect::{lookup_entry, HeaderInfo, InspectError};
pub use report::{EntryReport, ReportError, StoreReport};
pub use rootcert_format as format;
