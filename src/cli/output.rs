//! Output formatting for reports and fetch progress

use crate::cli::args::VerbosityLevel;
use crate::core::extractor::DecipherProgram;
use crate::core::normalizer::{StreamInventory, StreamRecord};
use crate::utils::mime::{is_audio_mime, is_video_mime};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Longest table-definition preview printed outside verbose mode
const DEFINITION_PREVIEW_CHARS: usize = 96;

/// Output formatter for streamsift
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    spinner: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            spinner: None,
        }
    }

    /// Show a spinner while a fetch is in flight
    pub fn start_spinner(&mut self, message: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Clear the active spinner
    pub fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print the stream inventory report
    pub fn print_inventory(&self, inventory: &StreamInventory) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let heading = inventory
            .title
            .as_deref()
            .unwrap_or(inventory.video_id.as_str());
        println!("📹 {}", heading);
        println!(
            "📊 {} streams ({} playable, {} ciphered)",
            inventory.stream_count(),
            inventory.playable().count(),
            inventory.ciphered().count()
        );
        println!();
        for record in &inventory.streams {
            self.print_stream_record(record);
        }
    }

    /// Print one stream record line
    fn print_stream_record(&self, record: &StreamRecord) {
        let itag = record
            .itag
            .map(|itag| itag.to_string())
            .unwrap_or_else(|| "?".to_string());
        let quality = record.quality_label.as_deref().unwrap_or("unknown");
        let container = record.container.as_deref().unwrap_or("?");
        let access = if record.is_playable {
            "direct".green()
        } else if record.is_ciphered {
            "ciphered".yellow()
        } else {
            "no url".red()
        };
        println!(
            "  📋 itag={:<4} {:<8} {:<6} {:<6} [{}]",
            itag,
            quality,
            media_kind(record.mime_type.as_deref()),
            container,
            access
        );
    }

    /// Print the extracted decipher program report
    pub fn print_program(&self, location: &str, program: &DecipherProgram) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!("🔑 Decipher logic from {}", location);
        println!("  table: {}", program.transform_table_name.cyan());
        println!("  operations: {}", program.operation_sequence);
        if self.verbosity == VerbosityLevel::Verbose {
            println!("  definition: {}", program.transform_table_body);
        } else {
            println!(
                "  definition: {}",
                preview(&program.transform_table_body, DEFINITION_PREVIEW_CHARS)
            );
        }
    }
}

/// Coarse media kind for the record listing
fn media_kind(mime_type: Option<&str>) -> &'static str {
    match mime_type {
        Some(mime) if is_video_mime(mime) => "video",
        Some(mime) if is_audio_mime(mime) => "audio",
        Some(_) => "other",
        None => "?",
    }
}

/// Truncate long source text for single-line display
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{}...", prefix)
}
