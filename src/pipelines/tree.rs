use std::fs;

use indicatif::ProgressBar;

use crate::helper::iqtree::{IqtreeCommand, TreeStatus, inspect_treefile, write_sentinel};
use crate::helper::{PipelineError, ProjectLayout, RunLogger, StageReport, sample_name};

/// Infers a tree for every alignment. An existing artifact is kept if it is
/// a genuine tree, deleted and regenerated if it is empty or carries the
/// failure sentinel, and skipped with a warning if unreadable. A failed
/// inference leaves the sentinel so the next run retries it while the
/// decoration stage can treat the sample as terminally failed.
pub fn build_all(root: &str, params: Option<&str>) -> Result<StageReport, PipelineError> {
    let layout = ProjectLayout::new(root);
    layout.require_dir(&layout.aligned_dir(), PipelineError::AlignedDirNotFound)?;
    fs::create_dir_all(layout.treefiles_dir())?;
    fs::create_dir_all(layout.reports_dir())?;

    let mut logger = RunLogger::open(&layout.run_log_path())?;
    logger.line("Starting tree stage")?;
    if let Some(p) = params {
        logger.line(&format!("IQ-TREE parameter override: {}", p))?;
    }

    let mut report = StageReport::new("tree");
    let alignments = layout.alignment_files()?;
    let bar = ProgressBar::new(alignments.len() as u64);

    for alignment in &alignments {
        let sample = sample_name(alignment);
        let treefile = layout.treefile_path(&sample);

        match inspect_treefile(&treefile) {
            Ok(TreeStatus::Genuine) => {
                logger.note(&format!(
                    "Treefile for '{}' already exists. Skipping.",
                    sample
                ))?;
                report.mark_skipped(&sample);
                bar.inc(1);
                continue;
            }
            Ok(TreeStatus::NeedsRetry) => {
                logger.note(&format!(
                    "Treefile for '{}' marks a failed attempt. Regenerating.",
                    sample
                ))?;
                if let Err(e) = fs::remove_file(&treefile) {
                    logger.warn(&format!(
                        "Could not remove stale treefile for {}: {}",
                        sample, e
                    ))?;
                    report.mark_failed(&sample);
                    bar.inc(1);
                    continue;
                }
            }
            Ok(TreeStatus::Absent) => {}
            Err(e) => {
                logger.warn(&format!("Unreadable treefile for {}: {}", sample, e))?;
                report.mark_skipped(&sample);
                bar.inc(1);
                continue;
            }
        }

        logger.note(&format!("Generating tree for {}...", sample))?;
        let cmd = IqtreeCommand::new(alignment, &layout.tree_prefix(&sample), params);
        let failed_stderr = match cmd.run() {
            Ok(output) if output.status.success() => None,
            Ok(output) => Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            Err(e) => Some(e.to_string()),
        };

        match failed_stderr {
            None => {
                logger.note(&format!("Successfully generated tree for {}.", sample))?;
                report.mark_processed(&sample);
            }
            Some(stderr) => {
                logger.warn(&format!("IQ-TREE error for {}:\n{}", sample, stderr))?;
                if let Err(e) = write_sentinel(&treefile) {
                    logger.warn(&format!(
                        "Could not record failure marker for {}: {}",
                        sample, e
                    ))?;
                }
                report.mark_failed(&sample);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    report.finish();
    report.write_json(&layout.stage_report_path("tree"))?;
    logger.note(&report.summary_line())?;
    Ok(report)
}
