//! Publishing a classification to the host.

use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{summarise, ClassLabel, Classification};
use crate::infrastructure::traits::Annotator;

/// Category attached to every annotation unless configured otherwise.
pub const DEFAULT_CATEGORY: &str = "Type Analysis";

/// Closing message of every completed run.
pub const SUCCESS_MESSAGE: &str = "Type analysis complete.";

/// Counts of objects annotated per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub typical_objects: usize,
    pub special_objects: usize,
}

/// Full annotation message for one class.
pub fn annotation_message(label: ClassLabel, summary: &str) -> String {
    let verdict = match label {
        ClassLabel::Typical => "typical",
        ClassLabel::Special => "special",
    };
    format!("These block types are {verdict}.\n\nSummary of Types:\n{summary}")
}

/// Attaches one annotation per non-empty class.
pub struct ReportEmitter<'a> {
    annotator: &'a dyn Annotator,
    category: &'a str,
}

impl<'a> ReportEmitter<'a> {
    pub fn new(annotator: &'a dyn Annotator, category: &'a str) -> Self {
        Self {
            annotator,
            category,
        }
    }

    /// Typical objects get an info annotation, special objects a warning.
    /// Empty classes are skipped.
    pub fn emit(&self, classification: &Classification) -> ApplicationResult<EmitSummary> {
        let typical_ids = classification.typical.object_ids();
        let special_ids = classification.special.object_ids();

        if !typical_ids.is_empty() {
            let summary = summarise(
                &classification.typical,
                ClassLabel::Typical,
                classification.cutoff,
                classification.percentage,
            );
            debug!("emit: {} typical objects", typical_ids.len());
            self.annotator
                .attach_info_to_objects(
                    self.category,
                    &annotation_message(ClassLabel::Typical, &summary),
                    &typical_ids,
                )
                .with_context("attach typical annotation")?;
        }

        if !special_ids.is_empty() {
            let summary = summarise(
                &classification.special,
                ClassLabel::Special,
                classification.cutoff,
                classification.percentage,
            );
            debug!("emit: {} special objects", special_ids.len());
            self.annotator
                .attach_warning_to_objects(
                    self.category,
                    &annotation_message(ClassLabel::Special, &summary),
                    &special_ids,
                )
                .with_context("attach special annotation")?;
        }

        Ok(EmitSummary {
            typical_objects: typical_ids.len(),
            special_objects: special_ids.len(),
        })
    }
}
