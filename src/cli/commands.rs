//! Command dispatch

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use termtree::Tree;
use tracing::{debug, instrument, warn};

use crate::application::services::{RunOutcome, TypeAnalysisService};
use crate::application::ApplicationResult;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{find_instances, ClassLabel, Node, SceneRoot};
use crate::infrastructure::annotator::{ConsoleAnnotator, RecordingAnnotator, RunReport};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the command selected on the command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `blockclass --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            completion(*shell);
            Ok(())
        }
        Commands::Config { command } => {
            let settings = Settings::load(cli.config.as_deref())?;
            config(command, &settings, cli.config.as_deref())
        }
        Commands::Analyze {
            scene,
            percentage,
            format,
            ids,
        } => {
            let settings = Settings::load(cli.config.as_deref())?.with_percentage(*percentage);
            settings.validate()?;
            analyze(settings, scene, *format, *ids)
        }
        Commands::Instances { scene } => instances(&read_only_service(cli, scene)?),
        Commands::Groups { scene } => groups(&read_only_service(cli, scene)?),
        Commands::Tree { scene } => tree(&read_only_service(cli, scene)?, scene),
    }
}

/// Service for commands that inspect a scene without publishing anything.
fn read_only_service(cli: &Cli, scene: &Path) -> CliResult<TypeAnalysisService> {
    let settings = Settings::load(cli.config.as_deref())?;
    settings.validate()?;
    let container = ServiceContainer::new(settings, Arc::new(RecordingAnnotator::new()));
    Ok(container.analysis_service(scene))
}

#[instrument(skip(settings))]
fn analyze(settings: Settings, scene: &Path, format: OutputFormat, ids: bool) -> CliResult<()> {
    let (result, report) = run_analysis(settings, scene, format, ids);

    match report {
        Some(report) => {
            let json = serde_json::to_string_pretty(&report).map_err(InfraError::from)?;
            writeln!(io::stdout(), "{json}")
                .map_err(|e| InfraError::io("write report to stdout", e))?;
        }
        None => {
            if let Ok(outcome) = &result {
                print_outcome(outcome);
            }
        }
    }

    result?;
    Ok(())
}

/// One analysis run.
///
/// JSON mode records every annotation, marks a failed run in the report and
/// returns it. Text mode prints annotations as they come; a failure is left to
/// the caller, which prints it once.
fn run_analysis(
    settings: Settings,
    scene: &Path,
    format: OutputFormat,
    ids: bool,
) -> (ApplicationResult<RunOutcome>, Option<RunReport>) {
    match format {
        OutputFormat::Text => {
            let service = ServiceContainer::new(settings, Arc::new(ConsoleAnnotator::new(ids)))
                .analysis_service(scene);
            (service.run(), None)
        }
        OutputFormat::Json => {
            let recorder = Arc::new(RecordingAnnotator::new());
            let service =
                ServiceContainer::new(settings, recorder.clone()).analysis_service(scene);
            let result = service.run();
            if let Err(e) = &result {
                if let Err(mark_err) = service.fail(e) {
                    warn!("could not mark run failed: {mark_err}");
                }
            }
            (result, Some(recorder.report()))
        }
    }
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Reported {
            classification,
            emitted,
        } => {
            output::header("Statistics");
            output::field("groups", &classification.group_count());
            output::field("mean", &format!("{:.2}", classification.mean));
            output::field(
                "cutoff",
                &format!(
                    "{} ({:.0}% of the mean)",
                    classification.cutoff, classification.percentage
                ),
            );
            output::field("typical objects", &emitted.typical_objects);
            output::field("special objects", &emitted.special_objects);
        }
        RunOutcome::NothingToReport => {
            output::warning("no block instances with named definitions; nothing to report");
        }
    }
}

fn instances(service: &TypeAnalysisService) -> CliResult<()> {
    let root = service.receive()?;
    let found = find_instances(&root);
    debug!("instances: {} found", found.len());
    for instance in found {
        output::instance(&instance.id, instance.definition_name());
    }
    Ok(())
}

fn groups(service: &TypeAnalysisService) -> CliResult<()> {
    let root = service.receive()?;
    let analysis = service.analyze(&root);

    for group in &analysis.groups {
        let class = analysis.classification.as_ref().map(|c| {
            if c.typical.contains(&group.name) {
                ClassLabel::Typical
            } else {
                ClassLabel::Special
            }
        });
        output::group(&group.name, group.len(), class);
    }
    if let Some(c) = &analysis.classification {
        output::info(&format!(
            "{} groups, mean {:.2}, cutoff {} ({:.0}% of the mean)",
            c.group_count(),
            c.mean,
            c.cutoff,
            c.percentage
        ));
    }
    if analysis.unnamed_count > 0 {
        output::warning(&format!(
            "{} instances without a named definition were skipped",
            analysis.unnamed_count
        ));
    }
    Ok(())
}

fn tree(service: &TypeAnalysisService, scene: &Path) -> CliResult<()> {
    let root = service.receive()?;
    let label = scene.display().to_string();
    output::info(&instance_tree(&root, label));
    Ok(())
}

/// Tree of block instances; branches holding no instances are pruned.
pub fn instance_tree(root: &SceneRoot, label: String) -> Tree<String> {
    let leaves = match root {
        SceneRoot::Sequence(nodes) => prune(nodes),
        SceneRoot::Node(node) => node.elements().map(prune).unwrap_or_default(),
    };
    Tree::new(label).with_leaves(leaves)
}

fn prune(nodes: &[Node]) -> Vec<Tree<String>> {
    nodes.iter().filter_map(node_tree).collect()
}

fn node_tree(node: &Node) -> Option<Tree<String>> {
    match node {
        Node::Leaf { .. } => None,
        Node::Container { id, elements } => {
            let leaves = prune(elements);
            (!leaves.is_empty()).then(|| Tree::new(id.clone()).with_leaves(leaves))
        }
        Node::Instance(instance) => {
            let name = instance.definition_name().unwrap_or("<unnamed>");
            let leaves = instance.elements.as_deref().map(prune).unwrap_or_default();
            Some(Tree::new(format!("{} [{}]", instance.id, name)).with_leaves(leaves))
        }
    }
}

fn config(command: &ConfigCommands, settings: &Settings, local: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Init => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "<unavailable>"),
            }
            let local = local.unwrap_or_else(|| Path::new(LOCAL_CONFIG_FILE));
            output::field("local", &local.display());
        }
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::{Definition, Instance};
    use crate::infrastructure::annotator::{RunOutcomeKind, Severity};
    use crate::util::testing::{init_test_setup, scene_json, write_file};

    #[test]
    fn given_scene_when_building_instance_tree_then_prunes_empty_branches() {
        let def = Arc::new(Definition::named("Fin"));
        let root = SceneRoot::Node(Node::container(
            "root",
            vec![
                Node::container("empty", vec![Node::leaf("wall")]),
                Node::container(
                    "level",
                    vec![Instance::new("a", Some(Arc::clone(&def)))
                        .with_elements(vec![Instance::new("b", None).into()])
                        .into()],
                ),
            ],
        ));

        let rendered = instance_tree(&root, "scene.json".to_string()).to_string();

        assert!(rendered.starts_with("scene.json"));
        assert!(rendered.contains("level"));
        assert!(rendered.contains("a [Fin]"));
        assert!(rendered.contains("b [<unnamed>]"));
        assert!(!rendered.contains("empty"));
    }

    #[test]
    fn given_cli_definition_when_checking_then_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_config_arg_when_inspecting_then_reads_env_var() {
        let cmd = Cli::command();
        let config = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .expect("config arg");
        assert_eq!(
            config.get_env().and_then(|env| env.to_str()),
            Some("BLOCKCLASS_CONFIG")
        );
    }

    #[test]
    fn given_scene_file_when_running_json_analysis_then_report_returned() {
        init_test_setup();
        let temp = TempDir::new().unwrap();
        let scene = write_file(
            temp.path(),
            "scene.json",
            &scene_json(&[("Fin A", 5), ("Fin B", 1)]),
        )
        .unwrap();

        let (result, report) =
            run_analysis(Settings::default(), &scene, OutputFormat::Json, false);

        assert!(matches!(result, Ok(RunOutcome::Reported { .. })));
        let report = report.expect("json report");
        assert_eq!(report.with_severity(Severity::Info).count(), 1);
        assert_eq!(report.with_severity(Severity::Warning).count(), 1);
        assert_eq!(
            report.status.map(|s| s.outcome),
            Some(RunOutcomeKind::Succeeded)
        );
    }

    #[test]
    fn given_missing_scene_when_running_json_analysis_then_report_marks_failure() {
        init_test_setup();
        let temp = TempDir::new().unwrap();

        let (result, report) = run_analysis(
            Settings::default(),
            &temp.path().join("missing.json"),
            OutputFormat::Json,
            false,
        );

        let err = result.unwrap_err();
        let status = report.expect("json report").status.expect("status");
        assert_eq!(status.outcome, RunOutcomeKind::Failed);
        assert_eq!(status.message, err.to_string());
    }

    #[test]
    fn given_missing_scene_when_running_text_analysis_then_error_without_report() {
        init_test_setup();
        let temp = TempDir::new().unwrap();

        let (result, report) = run_analysis(
            Settings::default(),
            &temp.path().join("missing.json"),
            OutputFormat::Text,
            false,
        );

        assert!(result.is_err());
        assert!(report.is_none());
    }
}
