//! Progress display and run summary
//!
//! Per-row lines are advisory: they tell the operator what happened to each
//! row but nothing downstream reads them.

use crate::models::{RowOutcome, RunOutcome};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Console reporter for a loader run
pub struct Reporter {
    progress: Option<ProgressBar>,
    quiet: bool,
    silent: bool,
}

impl Reporter {
    /// Progress bar and per-row lines, or only the plain summary when `quiet`
    pub fn new(quiet: bool) -> Self {
        Self {
            progress: None,
            quiet,
            silent: false,
        }
    }

    /// Prints nothing at all; for tests and library callers
    pub fn hidden() -> Self {
        Self {
            progress: None,
            quiet: true,
            silent: true,
        }
    }

    /// Announce a connection or setup step
    pub fn note(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✓".bright_green(), message);
        }
    }

    pub fn start(&mut self, total_rows: usize, destination: &str) {
        self.note(&format!(
            "Loading {} data rows into {}",
            total_rows.to_string().bright_white().bold(),
            destination
        ));

        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_rows as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.progress = Some(pb);
    }

    /// Report one processed row
    pub fn row(&self, outcome: &RowOutcome) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        if self.quiet {
            return;
        }

        let message = row_message(outcome);
        let line = match outcome {
            RowOutcome::Persisted { .. } => format!("{} {}", "✓".bright_green(), message),
            RowOutcome::ValidationFailed { .. } => {
                format!("{} {}", "⚠".bright_yellow(), message.yellow())
            }
            RowOutcome::PersistenceFailed { .. } => {
                format!("{} {}", "✗".bright_red(), message.red())
            }
        };

        match &self.progress {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    /// Close the progress bar and print the summary
    pub fn finish(&mut self, outcome: &RunOutcome) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        if self.silent {
            return;
        }
        if self.quiet {
            for line in summary_lines(outcome) {
                println!("{}", line);
            }
            return;
        }

        println!("\n{}", "========== Load complete ==========".bright_green().bold());
        println!(
            "{} {}",
            "Succeeded:".bright_cyan(),
            outcome.success_count.to_string().bright_white().bold()
        );
        let failed = outcome.error_count.to_string();
        println!(
            "{} {}",
            "Failed:   ".bright_cyan(),
            if outcome.error_count > 0 {
                failed.bright_red().bold()
            } else {
                failed.bright_white().bold()
            }
        );
        println!(
            "{} {}",
            "Total:    ".bright_cyan(),
            outcome.total_processed().to_string().bright_white().bold()
        );
        println!(
            "{} {}",
            "Success:  ".bright_cyan(),
            format!("{:.1}%", outcome.success_rate()).bright_white().bold()
        );
    }
}

/// Plain-text description of a row outcome
pub fn row_message(outcome: &RowOutcome) -> String {
    match outcome {
        RowOutcome::Persisted { line, id, name } => {
            format!("line {}: registered {} (ID: {})", line, name, id)
        }
        RowOutcome::ValidationFailed { error, .. } => error.to_string(),
        RowOutcome::PersistenceFailed {
            line,
            id,
            name,
            error,
        } => format!(
            "line {}: failed to insert {} (ID: {}): {}",
            line, name, id, error
        ),
    }
}

/// Plain-text run summary
pub fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    vec![
        format!("Succeeded: {}", outcome.success_count),
        format!("Failed:    {}", outcome.error_count),
        format!("Total:     {}", outcome.total_processed()),
        format!("Success:   {:.1}%", outcome.success_rate()),
    ]
}
