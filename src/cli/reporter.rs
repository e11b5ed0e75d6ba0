// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal output for the export commands

use crate::exporter::{ExportSummary, FaceReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(format: &str, summary: &ExportSummary, duration: Duration) {
        println!();
        Self::rule();
        println!(
            "{} {}",
            format!("{} export:", format).bold(),
            summary.path.display().to_string().cyan()
        );
        Self::rule();
        println!("  {} {}", "Object:".bright_black(), summary.object.cyan());
        println!("  {} {}", "Faces:".bright_black(), summary.faces.to_string().cyan());
        let label = if format == ".rec" { "Records:" } else { "Materials:" };
        println!("  {} {}", label.bright_black(), summary.entries.to_string().cyan());
        println!("  {} {}", "Time:".bright_black(), Self::format_duration(duration).yellow());
        Self::rule();
    }

    /// Print a compact per-face classification table
    pub fn report_classifications(object: &str, reports: &[FaceReport]) {
        println!("{} {}", "Object:".bold(), object.cyan());
        for report in reports {
            let flip = if report.flip_sign < 0 {
                "mirrored".yellow()
            } else {
                "normal".green()
            };
            println!(
                "  {:>5}  {:?} ({})  {}  rot {}  {}x{} at ({}, {})",
                report.face,
                report.classification.shape,
                report.shape_code,
                flip,
                report.classification.rotation,
                report.bounds.width,
                report.bounds.height,
                report.bounds.x,
                report.bounds.y
            );
        }
    }

    /// Error line on stderr
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "error:".red().bold(), message);
    }

    /// Warnings share stderr with the log output
    pub fn report_warning(message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    pub fn report_info(message: &str) {
        println!("{} {}", "::".bright_blue(), message);
    }

    pub fn success(message: &str) {
        println!("{} {}", "done:".green().bold(), message);
    }

    /// Progress bar over the faces of a mesh, hidden when `visible` is false
    pub fn face_progress(faces: usize, visible: bool) -> ProgressBar {
        if !visible {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(faces as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} faces")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    fn rule() {
        println!("{}", "─".repeat(60).bright_black());
    }

    fn format_duration(duration: Duration) -> String {
        match duration.as_micros() {
            us if us < 1_000 => format!("{}us", us),
            us if us < 1_000_000 => format!("{:.1}ms", duration.as_secs_f64() * 1e3),
            _ => format!("{:.2}s", duration.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_units() {
        let cases = [
            (Duration::from_micros(500), "500us"),
            (Duration::from_micros(2_500), "2.5ms"),
            (Duration::from_millis(1_250), "1.25s"),
        ];
        for (duration, expected) in cases {
            assert_eq!(Reporter::format_duration(duration), expected);
        }
    }

    #[test]
    fn test_hidden_progress() {
        let pb = Reporter::face_progress(10, false);
        pb.inc(3);
        assert!(pb.is_hidden());
    }
}
