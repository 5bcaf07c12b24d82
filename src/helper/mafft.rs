use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// MAFFT writes the alignment to stdout; the caller captures it and only
/// persists the artifact on a zero exit, so a failed run leaves no file.
#[derive(Debug)]
pub struct MafftCommand {
    input: PathBuf,
}

impl MafftCommand {
    pub fn new(input: &Path) -> Self {
        MafftCommand {
            input: input.to_path_buf(),
        }
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("mafft");
        cmd.arg("--retree")
            .arg("2")
            .arg(&self.input)
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
    fn test_mafft_command_building() {
        let cmd = MafftCommand::new(Path::new("raw_data/sample1.fasta")).build_command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["--retree", "2", "raw_data/sample1.fasta"]);
        assert_eq!(cmd.get_program(), "mafft");
    }
}
