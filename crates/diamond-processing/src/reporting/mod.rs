//! Report generation module.
//!
//! This module writes the cleaned record set and builds the
//! [`CleaningReport`] describing a pass. The same report serves:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use diamond_processing::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("data/events.csv", &result);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "events")?;
//! ```

mod generator;

pub use generator::{
    CleaningReport, DuplicateSection, LaunchAngleSection, RecordRow, ReportGenerator, record_rows,
};
