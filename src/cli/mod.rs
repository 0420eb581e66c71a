//! CLI argument parsing for marq
//!
//! Uses clap for argument parsing. Global flags: --config, --store-url,
//! --format, --quiet, --verbose, --log-level, --log-json

pub mod format;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use marq_core::rubric::CourseVariant;
pub use output::OutputFormat;

/// Marq - rubric-driven grading checklist for reflection essays
#[derive(Parser, Debug)]
#[command(name = "marq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the grade record API (overrides config and MARQ_STORE_URL)
    #[arg(long, global = true)]
    pub store_url: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive grading wizard
    Grade {
        /// Student ID to pre-fill
        #[arg(long)]
        student: Option<String>,

        /// Marker initials to pre-fill
        #[arg(long)]
        marker: Option<String>,

        /// Reflection variation (module_journey or challenge_focused)
        #[arg(long, value_parser = parse_course)]
        course: Option<CourseVariant>,
    },

    /// List saved grade records
    List {
        /// Filter by reflection variation
        #[arg(long, value_parser = parse_course)]
        course: Option<CourseVariant>,
    },

    /// Show one saved record in full
    Show {
        /// Position of the record in the collection
        index: usize,
    },

    /// Delete a saved record by position
    Delete {
        /// Position of the record in the collection
        index: usize,
    },

    /// Dump the record collection as pretty-printed JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Band distributions and summary statistics over saved records
    Overview {
        /// Filter by reflection variation
        #[arg(long, value_parser = parse_course)]
        course: Option<CourseVariant>,
    },

    /// Print the grading rubric
    Rubric,
}

fn parse_course(s: &str) -> Result<CourseVariant, String> {
    s.parse().map_err(|e: marq_core::error::MarqError| e.to_string())
}
