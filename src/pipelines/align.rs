use std::fs;

use indicatif::ProgressBar;

use crate::helper::mafft::MafftCommand;
use crate::helper::{PipelineError, ProjectLayout, RunLogger, StageReport, sample_name};

/// Aligns every raw sequence file lacking an alignment artifact. The MAFFT
/// output is captured from stdout and only written on a zero exit, through a
/// temp path, so downstream existence checks never see a truncated file.
pub fn align_all(root: &str) -> Result<StageReport, PipelineError> {
    let layout = ProjectLayout::new(root);
    layout.require_dir(&layout.raw_data_dir(), PipelineError::InputDirNotFound)?;
    fs::create_dir_all(layout.aligned_dir())?;
    fs::create_dir_all(layout.reports_dir())?;

    let mut logger = RunLogger::open(&layout.run_log_path())?;
    logger.line("Starting alignment stage")?;
    logger.line(&format!("Project root: {}", root))?;

    let mut report = StageReport::new("align");
    let inputs = layout.raw_sequence_files()?;
    let bar = ProgressBar::new(inputs.len() as u64);

    for input in &inputs {
        let sample = sample_name(input);
        let output_path = layout.alignment_path(&sample);

        if output_path.exists() {
            logger.note(&format!(
                "Aligned file for '{}' already exists. Skipping.",
                sample
            ))?;
            report.mark_skipped(&sample);
            bar.inc(1);
            continue;
        }

        logger.note(&format!("Aligning {}...", sample))?;
        match MafftCommand::new(input).run() {
            Ok(output) if output.status.success() => {
                match layout.atomic_write(&output_path, &output.stdout) {
                    Ok(()) => {
                        logger.note(&format!(
                            "Successfully aligned {} to '{}'",
                            sample,
                            output_path.display()
                        ))?;
                        report.mark_processed(&sample);
                    }
                    Err(e) => {
                        logger.warn(&format!(
                            "Error writing alignment for {}: {}",
                            sample, e
                        ))?;
                        report.mark_failed(&sample);
                    }
                }
            }
            Ok(output) => {
                logger.warn(&format!(
                    "Error aligning {}:\n{}",
                    sample,
                    String::from_utf8_lossy(&output.stderr)
                ))?;
                report.mark_failed(&sample);
            }
            Err(e) => {
                logger.warn(&format!("Error invoking mafft for {}: {}", sample, e))?;
                report.mark_failed(&sample);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    report.finish();
    report.write_json(&layout.stage_report_path("align"))?;
    logger.note(&report.summary_line())?;
    Ok(report)
}
