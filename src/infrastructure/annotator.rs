//! Annotator implementations
//!
//! `ConsoleAnnotator` renders annotations for a terminal, `RecordingAnnotator`
//! keeps them in a serializable `RunReport`.

use std::io;
use std::sync::{Mutex, PoisonError};

use colored::Colorize;
use serde::Serialize;

use crate::infrastructure::traits::Annotator;

/// Severity of an attached annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// One annotation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub object_ids: Vec<String>,
}

/// Final run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcomeKind {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    pub outcome: RunOutcomeKind,
    pub message: String,
}

/// Everything published during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub annotations: Vec<Annotation>,
    pub status: Option<RunStatus>,
}

impl RunReport {
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |a| a.severity == severity)
    }
}

/// Records annotations in memory.
#[derive(Debug, Default)]
pub struct RecordingAnnotator {
    report: Mutex<RunReport>,
}

impl RecordingAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn report(&self) -> RunReport {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, severity: Severity, category: &str, message: &str, object_ids: &[String]) {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .annotations
            .push(Annotation {
                severity,
                category: category.to_string(),
                message: message.to_string(),
                object_ids: object_ids.to_vec(),
            });
    }

    fn finish(&self, outcome: RunOutcomeKind, message: &str) {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status = Some(RunStatus {
            outcome,
            message: message.to_string(),
        });
    }
}

impl Annotator for RecordingAnnotator {
    fn attach_info_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()> {
        self.record(Severity::Info, category, message, object_ids);
        Ok(())
    }

    fn attach_warning_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()> {
        self.record(Severity::Warning, category, message, object_ids);
        Ok(())
    }

    fn mark_run_success(&self, message: &str) -> io::Result<()> {
        self.finish(RunOutcomeKind::Succeeded, message);
        Ok(())
    }

    fn mark_run_failed(&self, message: &str) -> io::Result<()> {
        self.finish(RunOutcomeKind::Failed, message);
        Ok(())
    }
}

/// Prints annotations to stdout.
///
/// Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
#[derive(Debug, Default)]
pub struct ConsoleAnnotator {
    /// Print object ids under each annotation
    pub show_ids: bool,
}

impl ConsoleAnnotator {
    pub fn new(show_ids: bool) -> Self {
        Self { show_ids }
    }

    fn print(&self, tag: colored::ColoredString, category: &str, message: &str, ids: &[String]) {
        println!(
            "{} [{}] {} object(s)",
            tag,
            category.cyan().bold(),
            ids.len()
        );
        for line in message.lines() {
            println!("  {}", line);
        }
        if self.show_ids {
            for id in ids {
                println!("    - {}", id.dimmed());
            }
        }
    }
}

impl Annotator for ConsoleAnnotator {
    fn attach_info_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()> {
        self.print("info".green().bold(), category, message, object_ids);
        Ok(())
    }

    fn attach_warning_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()> {
        self.print("warning".yellow().bold(), category, message, object_ids);
        Ok(())
    }

    fn mark_run_success(&self, message: &str) -> io::Result<()> {
        println!("{} {}", "✓".green(), message);
        Ok(())
    }

    fn mark_run_failed(&self, message: &str) -> io::Result<()> {
        eprintln!("{} {}", "✗".red(), message);
        Ok(())
    }
}
