use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use indicatif::ProgressBar;

use crate::helper::iqtree::{contains_sentinel, head_bytes, SENTINEL_WINDOW};
use crate::helper::svg::{matrix_missing_label, no_tree_label, placeholder_svg};
use crate::helper::{PipelineError, ProjectLayout, RunLogger, StageReport, sample_name};

/// External renderer invocation: tree + matrix in, circular layout, leaf
/// labels suppressed, output stem chosen by the pipeline (the script picks
/// the extension).
#[derive(Debug)]
pub struct DecorateCommand {
    script: PathBuf,
    treefile: PathBuf,
    matrix: PathBuf,
    out_stem: PathBuf,
}

impl DecorateCommand {
    pub fn new(script: &Path, treefile: &Path, matrix: &Path, out_stem: &Path) -> Self {
        DecorateCommand {
            script: script.to_path_buf(),
            treefile: treefile.to_path_buf(),
            matrix: matrix.to_path_buf(),
            out_stem: out_stem.to_path_buf(),
        }
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("python3");
        cmd.arg(&self.script)
            .arg("-t")
            .arg(&self.treefile)
            .arg("-m")
            .arg(&self.matrix)
            .arg("-tm")
            .arg("circular")
            .arg("-l")
            .arg("no")
            .arg("-outfile")
            .arg(&self.out_stem)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn run(&self) -> io::Result<Output> {
        self.build_command().output()
    }
}

/// Pairs every tree with its data matrix and renders a diagram. Samples with
/// a missing matrix or a failed-tree sentinel get a placeholder diagram
/// instead of a renderer invocation. Whether pre-existing diagrams are kept
/// is an explicit choice: the default re-renders unconditionally,
/// `skip_existing` short-circuits samples that already have any diagram.
pub fn decorate_all(root: &str, skip_existing: bool) -> Result<StageReport, PipelineError> {
    let layout = ProjectLayout::new(root);
    layout.require_dir(&layout.treefiles_dir(), PipelineError::TreefilesDirNotFound)?;
    let script = layout.render_script();
    if !script.exists() {
        return Err(PipelineError::RenderScriptNotFound(
            script.to_string_lossy().into_owned(),
        ));
    }
    fs::create_dir_all(layout.diagrams_dir())?;
    fs::create_dir_all(layout.reports_dir())?;

    let mut logger = RunLogger::open(&layout.run_log_path())?;
    logger.line("Starting decoration stage")?;

    let mut report = StageReport::new("decorate");
    let treefiles = layout.tree_files()?;
    let bar = ProgressBar::new(treefiles.len() as u64);

    for treefile in &treefiles {
        let sample = sample_name(treefile);

        if skip_existing && layout.has_diagram(&sample) {
            logger.note(&format!(
                "Diagram for '{}' already exists. Skipping.",
                sample
            ))?;
            report.mark_skipped(&sample);
            bar.inc(1);
            continue;
        }

        let matrix_path = layout.matrix_path(&sample);
        if !matrix_path.exists() {
            logger.warn(&format!(
                "Warning: Matrix file for '{}' not found. Writing placeholder.",
                sample
            ))?;
            write_placeholder(&layout, &sample, &matrix_missing_label(&sample), &mut logger, &mut report)?;
            bar.inc(1);
            continue;
        }

        match head_bytes(treefile, SENTINEL_WINDOW) {
            Ok(head) if contains_sentinel(&head) => {
                logger.warn(&format!(
                    "Tree for '{}' marked as failed. Writing placeholder.",
                    sample
                ))?;
                write_placeholder(&layout, &sample, &no_tree_label(&sample), &mut logger, &mut report)?;
                bar.inc(1);
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                logger.warn(&format!("Unreadable treefile for {}: {}", sample, e))?;
                report.mark_skipped(&sample);
                bar.inc(1);
                continue;
            }
        }

        logger.note(&format!("Decorating tree for {}...", sample))?;
        let cmd = DecorateCommand::new(&script, treefile, &matrix_path, &layout.diagram_stem(&sample));
        match cmd.run() {
            Ok(output) if output.status.success() => {
                logger.note(&format!("Finished decorating tree for {}.", sample))?;
                report.mark_processed(&sample);
            }
            Ok(output) => {
                logger.warn(&format!(
                    "Error decorating tree for {}:\n{}",
                    sample,
                    String::from_utf8_lossy(&output.stderr)
                ))?;
                report.mark_failed(&sample);
            }
            Err(e) => {
                logger.warn(&format!("Error invoking renderer for {}: {}", sample, e))?;
                report.mark_failed(&sample);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    report.finish();
    report.write_json(&layout.stage_report_path("decorate"))?;
    logger.note(&report.summary_line())?;
    Ok(report)
}

fn write_placeholder(
    layout: &ProjectLayout,
    sample: &str,
    label: &str,
    logger: &mut RunLogger,
    report: &mut StageReport,
) -> Result<(), PipelineError> {
    let path = layout.placeholder_diagram_path(sample);
    match fs::write(&path, placeholder_svg(label)) {
        Ok(()) => {
            report.mark_processed(sample);
        }
        Err(e) => {
            logger.warn(&format!(
                "Error writing placeholder diagram for {}: {}",
                sample, e
            ))?;
            report.mark_failed(sample);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorate_command_building() {
        let cmd = DecorateCommand::new(
            Path::new("scripts/decorate_tree.py"),
            Path::new("treefiles/s1.treefile"),
            Path::new("matrices/s1_data_matrix.tsv"),
            Path::new("diagrams/s1"),
        )
        .build_command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "scripts/decorate_tree.py",
                "-t",
                "treefiles/s1.treefile",
                "-m",
                "matrices/s1_data_matrix.tsv",
                "-tm",
                "circular",
                "-l",
                "no",
                "-outfile",
                "diagrams/s1"
            ]
        );
        assert_eq!(cmd.get_program(), "python3");
    }
}
