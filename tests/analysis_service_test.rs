//! Tests for TypeAnalysisService and report emission

use std::io;
use std::sync::Arc;

use blockclass::application::services::{RunOutcome, TypeAnalysisService};
use blockclass::application::{ApplicationError, SUCCESS_MESSAGE};
use blockclass::config::Settings;
use blockclass::domain::{Definition, Instance, Node, SceneRoot};
use blockclass::infrastructure::annotator::{RecordingAnnotator, RunOutcomeKind, Severity};
use blockclass::infrastructure::scene::StaticSource;
use blockclass::infrastructure::traits::{Annotator, TreeSource};
use blockclass::util::testing::init_test_setup;

/// Scene with one group per `(name, count)` pair, instances at the top level.
fn scene(groups: &[(&str, usize)]) -> SceneRoot {
    let mut elements = Vec::new();
    for (name, count) in groups {
        let def = Arc::new(Definition::named(*name));
        for i in 0..*count {
            elements.push(Instance::new(format!("{name}-{i}"), Some(Arc::clone(&def))).into());
        }
    }
    SceneRoot::Node(Node::container("root", elements))
}

fn service(
    root: SceneRoot,
    percentage: f64,
) -> (TypeAnalysisService, Arc<RecordingAnnotator>) {
    init_test_setup();
    let annotator = Arc::new(RecordingAnnotator::new());
    let settings = Settings::default().with_percentage(Some(percentage));
    let service = TypeAnalysisService::new(
        Arc::new(StaticSource::new(root)),
        annotator.clone(),
        Arc::new(settings),
    );
    (service, annotator)
}

#[test]
fn given_dominant_group_when_running_then_info_and_warning_emitted() {
    // Arrange: sizes [10, 10, 10, 10, 60], mean 20, cutoff 12
    let root = scene(&[("A", 10), ("B", 10), ("C", 10), ("D", 10), ("E", 60)]);
    let (service, annotator) = service(root, 60.0);

    // Act
    let outcome = service.run().unwrap();

    // Assert
    let RunOutcome::Reported {
        classification,
        emitted,
    } = outcome
    else {
        panic!("expected a report");
    };
    assert_eq!(classification.cutoff, 12);
    assert_eq!(emitted.typical_objects, 60);
    assert_eq!(emitted.special_objects, 40);

    let report = annotator.report();
    let info: Vec<_> = report.with_severity(Severity::Info).collect();
    let warnings: Vec<_> = report.with_severity(Severity::Warning).collect();
    assert_eq!(info.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(info[0].category, "Type Analysis");
    assert_eq!(
        info[0].message,
        "These block types are typical.\n\nSummary of Types:\n\
         \nTypical Types (12 occurrences or more, 60% of the mean):\nE: 60"
    );
    assert!(warnings[0]
        .message
        .ends_with("\nSpecial Types (12 occurrences or fewer, 60% of the mean):\nA: 10\nB: 10\nC: 10\nD: 10"));
    assert_eq!(warnings[0].object_ids.first().map(String::as_str), Some("A-0"));
    assert_eq!(warnings[0].object_ids.last().map(String::as_str), Some("D-9"));
    assert_eq!(report.status.map(|s| s.outcome), Some(RunOutcomeKind::Succeeded));
}

#[test]
fn given_equal_groups_when_running_then_no_warning_emitted() {
    let (service, annotator) = service(scene(&[("A", 4), ("B", 4)]), 60.0);

    service.run().unwrap();

    let report = annotator.report();
    assert_eq!(report.with_severity(Severity::Info).count(), 1);
    assert_eq!(report.with_severity(Severity::Warning).count(), 0);
}

#[test]
fn given_empty_scene_when_running_then_nothing_annotated_and_success() {
    let (service, annotator) = service(SceneRoot::empty(), 60.0);

    let outcome = service.run().unwrap();

    assert!(matches!(outcome, RunOutcome::NothingToReport));
    let report = annotator.report();
    assert!(report.annotations.is_empty());
    let status = report.status.expect("status");
    assert_eq!(status.outcome, RunOutcomeKind::Succeeded);
    assert_eq!(status.message, SUCCESS_MESSAGE);
}

#[test]
fn given_only_unnamed_instances_when_running_then_nothing_to_report() {
    let root = SceneRoot::Sequence(vec![
        Instance::new("a", None).into(),
        Instance::new("b", Some(Arc::new(Definition::default()))).into(),
    ]);
    let (service, annotator) = service(root, 60.0);

    let outcome = service.run().unwrap();

    assert!(matches!(outcome, RunOutcome::NothingToReport));
    assert!(annotator.report().annotations.is_empty());
}

#[test]
fn given_unnamed_instances_when_analyzing_then_counted_but_not_grouped() {
    let def = Arc::new(Definition::named("Fin"));
    let root = SceneRoot::Sequence(vec![
        Instance::new("a", Some(Arc::clone(&def))).into(),
        Instance::new("b", None).into(),
    ]);
    let (service, _) = service(root.clone(), 60.0);

    let analysis = service.analyze(&root);

    assert_eq!(analysis.instance_count, 2);
    assert_eq!(analysis.unnamed_count, 1);
    assert_eq!(analysis.groups.object_ids(), vec!["a".to_string()]);
}

#[test]
fn given_zero_percentage_when_running_then_everything_typical() {
    let (service, annotator) = service(scene(&[("A", 1), ("B", 5)]), 0.0);

    service.run().unwrap();

    let report = annotator.report();
    assert_eq!(report.with_severity(Severity::Warning).count(), 0);
    let info: Vec<_> = report.with_severity(Severity::Info).collect();
    assert!(info[0].message.contains("(0 occurrences or more, 0% of the mean)"));
}

struct FailingSource;

impl TreeSource for FailingSource {
    fn receive(&self) -> io::Result<SceneRoot> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such version"))
    }
}

#[test]
fn given_failing_source_when_running_then_error_propagates_without_status() {
    init_test_setup();
    let annotator = Arc::new(RecordingAnnotator::new());
    let service = TypeAnalysisService::new(
        Arc::new(FailingSource),
        annotator.clone(),
        Arc::new(Settings::default()),
    );

    let err = service.run().unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
    assert!(annotator.report().status.is_none());

    service.fail(&err).unwrap();
    let status = annotator.report().status.expect("status");
    assert_eq!(status.outcome, RunOutcomeKind::Failed);
}

struct RejectingAnnotator;

impl Annotator for RejectingAnnotator {
    fn attach_info_to_objects(&self, _: &str, _: &str, _: &[String]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "host down"))
    }

    fn attach_warning_to_objects(&self, _: &str, _: &str, _: &[String]) -> io::Result<()> {
        Ok(())
    }

    fn mark_run_success(&self, _: &str) -> io::Result<()> {
        Ok(())
    }

    fn mark_run_failed(&self, _: &str) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn given_failing_annotator_when_running_then_error_propagates() {
    init_test_setup();
    let service = TypeAnalysisService::new(
        Arc::new(StaticSource::new(scene(&[("A", 3)]))),
        Arc::new(RejectingAnnotator),
        Arc::new(Settings::default()),
    );

    let err = service.run().unwrap_err();

    assert_eq!(err.io_kind(), Some(io::ErrorKind::ConnectionRefused));
}
