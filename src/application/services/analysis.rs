//! Type analysis service
//!
//! Receives a scene, classifies its block instances and publishes the result.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::report::{EmitSummary, ReportEmitter, SUCCESS_MESSAGE};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    classify, find_instances, group_by_definition, Classification, DomainError, GroupMapping,
    SceneRoot,
};
use crate::infrastructure::traits::{Annotator, TreeSource};

/// Result of analysing one scene, before anything is published.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Instances found by traversal
    pub instance_count: usize,
    /// Instances dropped for lacking a named definition
    pub unnamed_count: usize,
    /// Named groups in discovery order
    pub groups: GroupMapping,
    /// `None` when no named groups exist
    pub classification: Option<Classification>,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Annotations were published
    Reported {
        classification: Classification,
        emitted: EmitSummary,
    },
    /// No groups to classify; nothing was annotated
    NothingToReport,
}

/// Service orchestrating traversal, classification and reporting.
pub struct TypeAnalysisService {
    source: Arc<dyn TreeSource>,
    annotator: Arc<dyn Annotator>,
    settings: Arc<Settings>,
}

impl TypeAnalysisService {
    /// Create a new type analysis service.
    pub fn new(
        source: Arc<dyn TreeSource>,
        annotator: Arc<dyn Annotator>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            source,
            annotator,
            settings,
        }
    }

    /// Fetch the scene from the source.
    pub fn receive(&self) -> ApplicationResult<SceneRoot> {
        self.source.receive().with_context("receive scene")
    }

    /// Traverse, group and classify `root` with the configured percentage.
    pub fn analyze(&self, root: &SceneRoot) -> Analysis {
        let percentage = self.settings.percentage_mean_cutoff;
        if percentage < 0.0 {
            warn!("negative percentage {percentage}: every group will be typical");
        }

        let instances = find_instances(root);
        let groups = group_by_definition(instances.iter().copied());
        let grouped: usize = groups.iter().map(|g| g.len()).sum();
        debug!(
            "analyze: {} instances, {} groups",
            instances.len(),
            groups.len()
        );

        let classification = match classify(&groups, percentage) {
            Ok(c) => Some(c),
            Err(DomainError::EmptyGroupSet) => None,
        };

        Analysis {
            instance_count: instances.len(),
            unnamed_count: instances.len() - grouped,
            groups,
            classification,
        }
    }

    /// Full run: receive, classify, annotate, mark success.
    ///
    /// A scene without named instances is a successful run with nothing to
    /// report. Errors from the source or annotator propagate.
    #[instrument(skip(self))]
    pub fn run(&self) -> ApplicationResult<RunOutcome> {
        let root = self.receive()?;
        let analysis = self.analyze(&root);
        if analysis.unnamed_count > 0 {
            debug!(
                "run: skipped {} instances without a named definition",
                analysis.unnamed_count
            );
        }

        let outcome = match analysis.classification {
            Some(classification) => {
                info!(
                    "classified {} groups: mean={:.2} cutoff={} typical={} special={}",
                    classification.group_count(),
                    classification.mean,
                    classification.cutoff,
                    classification.typical.len(),
                    classification.special.len()
                );
                let emitted = ReportEmitter::new(self.annotator.as_ref(), &self.settings.category)
                    .emit(&classification)?;
                RunOutcome::Reported {
                    classification,
                    emitted,
                }
            }
            None => {
                info!("no block instances with named definitions; nothing to report");
                RunOutcome::NothingToReport
            }
        };

        self.annotator
            .mark_run_success(SUCCESS_MESSAGE)
            .with_context("mark run success")?;
        Ok(outcome)
    }

    /// Mark the run failed after an upstream error.
    pub fn fail(&self, error: &ApplicationError) -> ApplicationResult<()> {
        self.annotator
            .mark_run_failed(&error.to_string())
            .with_context("mark run failed")
    }
}
