use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// blastn writes its report to `-out` itself; callers point it at a temp
/// path and rename into place on success so an interrupted search never
/// masquerades as a finished one.
#[derive(Debug)]
pub struct BlastnCommand {
    query: PathBuf,
    db: PathBuf,
    out: PathBuf,
}

impl BlastnCommand {
    pub fn new(query: &Path, db: &Path, out: &Path) -> Self {
        BlastnCommand {
            query: query.to_path_buf(),
            db: db.to_path_buf(),
            out: out.to_path_buf(),
        }
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("blastn");
        cmd.arg("-query")
            .arg(&self.query)
            .arg("-db")
            .arg(&self.db)
            .arg("-out")
            .arg(&self.out)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn run(&self) -> io::Result<Output> {
        self.build_command().output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blastn_command_building() {
        let cmd = BlastnCommand::new(
            Path::new("raw_data/s1.fasta"),
            Path::new("BLAST/mito"),
            Path::new("BLAST_results/s1_b.txt.part"),
        )
        .build_command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-query",
                "raw_data/s1.fasta",
                "-db",
                "BLAST/mito",
                "-out",
                "BLAST_results/s1_b.txt.part"
            ]
        );
        assert_eq!(cmd.get_program(), "blastn");
    }
}
