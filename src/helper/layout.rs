use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::helper::error::PipelineError;

/// Owns every artifact path convention of a pipeline project directory.
/// All stages resolve their inputs and outputs through this type, so the
/// on-disk contract lives in one place.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: &str) -> Self {
        ProjectLayout {
            root: PathBuf::from(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_data_dir(&self) -> PathBuf {
        self.root.join("raw_data")
    }

    pub fn aligned_dir(&self) -> PathBuf {
        self.root.join("aligned")
    }

    pub fn treefiles_dir(&self) -> PathBuf {
        self.root.join("treefiles")
    }

    pub fn blast_dir(&self) -> PathBuf {
        self.root.join("BLAST")
    }

    pub fn blast_results_dir(&self) -> PathBuf {
        self.root.join("BLAST_results")
    }

    pub fn matrices_dir(&self) -> PathBuf {
        self.root.join("matrices")
    }

    pub fn diagrams_dir(&self) -> PathBuf {
        self.root.join("diagrams")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn render_script(&self) -> PathBuf {
        self.root.join("scripts").join("decorate_tree.py")
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.root.join("run_log.txt")
    }

    pub fn alignment_path(&self, sample: &str) -> PathBuf {
        self.aligned_dir().join(format!("{}.aln", sample))
    }

    pub fn treefile_path(&self, sample: &str) -> PathBuf {
        self.treefiles_dir().join(format!("{}.treefile", sample))
    }

    /// IQ-TREE writes a family of files named after this prefix; the
    /// `.treefile` sibling is the one the pipeline tracks.
    pub fn tree_prefix(&self, sample: &str) -> PathBuf {
        self.treefiles_dir().join(sample)
    }

    pub fn blast_result_path(&self, sample: &str) -> PathBuf {
        self.blast_results_dir().join(format!("{}_b.txt", sample))
    }

    pub fn matrix_path(&self, sample: &str) -> PathBuf {
        self.matrices_dir().join(format!("{}_data_matrix.tsv", sample))
    }

    /// Output stem handed to the renderer; the renderer picks the extension.
    pub fn diagram_stem(&self, sample: &str) -> PathBuf {
        self.diagrams_dir().join(sample)
    }

    pub fn placeholder_diagram_path(&self, sample: &str) -> PathBuf {
        self.diagrams_dir().join(format!("{}.svg", sample))
    }

    pub fn stage_report_path(&self, stage: &str) -> PathBuf {
        self.reports_dir().join(format!("{}_report.json", stage))
    }

    /// Checks a stage prerequisite directory, mapping absence to the given
    /// error constructor.
    pub fn require_dir<F>(&self, dir: &Path, missing: F) -> Result<(), PipelineError>
    where
        F: FnOnce(String) -> PipelineError,
    {
        if !dir.exists() {
            return Err(missing(dir.to_string_lossy().into_owned()));
        }
        if !dir.is_dir() {
            return Err(PipelineError::NotADirectory(
                dir.to_string_lossy().into_owned(),
            ));
        }
        Ok(())
    }

    /// Regular files under `raw_data/`, sorted by name.
    pub fn raw_sequence_files(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.raw_data_dir(), None)
    }

    /// Alignment artifacts, sorted by name.
    pub fn alignment_files(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.aligned_dir(), Some("aln"))
    }

    /// Tree artifacts (genuine or sentinel), sorted by name.
    pub fn tree_files(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.treefiles_dir(), Some("treefile"))
    }

    /// Whether any file in `diagrams/` already carries this sample's stem,
    /// regardless of the extension the renderer chose.
    pub fn has_diagram(&self, sample: &str) -> bool {
        let dir = self.diagrams_dir();
        let Ok(entries) = fs::read_dir(&dir) else {
            return false;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && sample_name(&path) == sample {
                return true;
            }
        }
        false
    }

    /// Writes through a `.part` sibling and renames into place, so a killed
    /// run never leaves a truncated artifact behind.
    pub fn atomic_write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, contents) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, path)
    }
}

/// Sibling path with `.part` appended, used for in-flight writes.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(".part");
    PathBuf::from(os)
}

/// Base name with the final extension stripped; the sample identity threading
/// through all four stages.
pub fn sample_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_files(dir: &Path, extension: Option<&str>) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = extension {
            let matches = path
                .extension()
                .map(|e| e.to_string_lossy() == ext)
                .unwrap_or(false);
            if !matches {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}
