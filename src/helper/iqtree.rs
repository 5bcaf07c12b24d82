use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Content of a tree artifact recorded after a failed inference run. A
/// sentinel file is retried by the tree stage on the next run and treated as
/// terminal by the decoration stage.
pub const TREE_SENTINEL: &str = "NO_TREE";

/// How far into a tree artifact the sentinel check looks.
pub const SENTINEL_WINDOW: usize = 16;

/// Model auto-selection with 1000 SH-aLRT and 1000 ultrafast bootstrap
/// replicates, automatic thread count.
pub const DEFAULT_IQTREE_PARAMS: &str = "-m TEST -alrt 1000 -bb 1000 -nt AUTO";

#[derive(Debug)]
pub struct IqtreeCommand {
    alignment: PathBuf,
    prefix: PathBuf,
    params: String,
}

impl IqtreeCommand {
    pub fn new(alignment: &Path, prefix: &Path, params: Option<&str>) -> Self {
        IqtreeCommand {
            alignment: alignment.to_path_buf(),
            prefix: prefix.to_path_buf(),
            params: params.unwrap_or(DEFAULT_IQTREE_PARAMS).to_string(),
        }
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("iqtree");
        cmd.arg("-quiet").arg("-pre").arg(&self.prefix);
        for param in self.params.split_whitespace() {
            cmd.arg(param);
        }
        cmd.arg("-s")
            .arg(&self.alignment)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn run(&self) -> io::Result<Output> {
        self.build_command().output()
    }
}

/// State of the expected tree artifact for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStatus {
    /// No artifact on disk; never attempted (or cleaned up).
    Absent,
    /// A real tree-engine output; the sample is complete.
    Genuine,
    /// Empty file or failure sentinel; delete and regenerate.
    NeedsRetry,
}

pub fn contains_sentinel(head: &[u8]) -> bool {
    head.windows(TREE_SENTINEL.len())
        .any(|w| w == TREE_SENTINEL.as_bytes())
}

/// Classifies a tree artifact from its first `SENTINEL_WINDOW` bytes.
pub fn inspect_treefile(path: &Path) -> io::Result<TreeStatus> {
    if !path.exists() {
        return Ok(TreeStatus::Absent);
    }
    let head = head_bytes(path, SENTINEL_WINDOW)?;
    if head.is_empty() || contains_sentinel(&head) {
        Ok(TreeStatus::NeedsRetry)
    } else {
        Ok(TreeStatus::Genuine)
    }
}

pub fn head_bytes(path: &Path, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(n);
    File::open(path)?.take(n as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Records a confirmed inference failure so reruns can tell "attempted,
/// failed" apart from "never attempted".
pub fn write_sentinel(path: &Path) -> io::Result<()> {
    fs::write(path, format!("{}\n", TREE_SENTINEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iqtree_command_default_params() {
        let cmd = IqtreeCommand::new(
            Path::new("aligned/s1.aln"),
            Path::new("treefiles/s1"),
            None,
        )
        .build_command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-quiet",
                "-pre",
                "treefiles/s1",
                "-m",
                "TEST",
                "-alrt",
                "1000",
                "-bb",
                "1000",
                "-nt",
                "AUTO",
                "-s",
                "aligned/s1.aln"
            ]
        );
    }

    #[test]
    fn test_iqtree_command_param_override() {
        let cmd = IqtreeCommand::new(
            Path::new("aligned/s1.aln"),
            Path::new("treefiles/s1"),
            Some("-m GTR+G -nt 4"),
        )
        .build_command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-quiet",
                "-pre",
                "treefiles/s1",
                "-m",
                "GTR+G",
                "-nt",
                "4",
                "-s",
                "aligned/s1.aln"
            ]
        );
    }

    #[test]
    fn test_contains_sentinel() {
        assert!(contains_sentinel(b"NO_TREE\n"));
        assert!(contains_sentinel(b"  NO_TREE junk"));
        assert!(!contains_sentinel(b"(A:0.1,B:0.2);"));
        assert!(!contains_sentinel(b""));
        assert!(!contains_sentinel(b"NO_TR"));
    }

    #[test]
    fn test_inspect_treefile() {
        assert_eq!(
            inspect_treefile(Path::new("tests/data/project/treefiles/no_such.treefile")).unwrap(),
            TreeStatus::Absent
        );
        assert_eq!(
            inspect_treefile(Path::new("tests/data/project/treefiles/failed.treefile")).unwrap(),
            TreeStatus::NeedsRetry
        );
        assert_eq!(
            inspect_treefile(Path::new("tests/data/project/treefiles/empty.treefile")).unwrap(),
            TreeStatus::NeedsRetry
        );
        assert_eq!(
            inspect_treefile(Path::new("tests/data/project/treefiles/sample1.treefile")).unwrap(),
            TreeStatus::Genuine
        );
    }
}
