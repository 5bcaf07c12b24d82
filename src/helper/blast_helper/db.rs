use std::fs;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::helper::error::PipelineError;

/// Closed set of supported BLAST database sources. Anything outside this
/// enumeration is rejected before the stage does any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbSource {
    /// NCBI mitochondrial nucleotide database.
    Mito,
    /// NCBI SSU eukaryote rRNA (18S) database.
    Ssu18S,
}

impl DbSource {
    pub fn from_name(name: &str) -> Result<Self, PipelineError> {
        match name {
            "mito" => Ok(DbSource::Mito),
            "18S" => Ok(DbSource::Ssu18S),
            other => Err(PipelineError::UnknownDbSource(other.to_string())),
        }
    }

    /// Concrete database identifier as published by NCBI.
    pub fn db_name(&self) -> &'static str {
        match self {
            DbSource::Mito => "mito",
            DbSource::Ssu18S => "SSU_eukaryote_rRNA",
        }
    }

    pub fn archive_url(&self) -> String {
        format!(
            "https://ftp.ncbi.nlm.nih.gov/blast/db/{}.tar.gz",
            self.db_name()
        )
    }

    /// Path passed to blastn's `-db` argument.
    pub fn db_path(&self, blast_dir: &Path) -> PathBuf {
        blast_dir.join(self.db_name())
    }

    /// The `.nhr` header file is the presence marker for an installed
    /// nucleotide database.
    pub fn is_installed(&self, blast_dir: &Path) -> bool {
        blast_dir
            .join(format!("{}.nhr", self.db_name()))
            .exists()
    }

    /// Downloads and unpacks the database archive into `blast_dir` unless the
    /// install marker is already present. The archive is streamed through
    /// gzip and tar decoding, so no intermediate file is written. Returns
    /// whether an install happened.
    pub fn ensure_installed(&self, blast_dir: &Path) -> Result<bool, PipelineError> {
        if self.is_installed(blast_dir) {
            return Ok(false);
        }
        fs::create_dir_all(blast_dir)?;
        let response = reqwest::blocking::get(self.archive_url())?.error_for_status()?;
        let mut archive = Archive::new(GzDecoder::new(response));
        archive.unpack(blast_dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_closed_enumeration() {
        assert_eq!(DbSource::from_name("mito").unwrap(), DbSource::Mito);
        assert_eq!(DbSource::from_name("18S").unwrap(), DbSource::Ssu18S);
        assert!(matches!(
            DbSource::from_name("nt"),
            Err(PipelineError::UnknownDbSource(_))
        ));
        // case sensitive, like the original selector
        assert!(DbSource::from_name("Mito").is_err());
    }

    #[test]
    fn test_db_names_and_urls() {
        assert_eq!(DbSource::Mito.db_name(), "mito");
        assert_eq!(DbSource::Ssu18S.db_name(), "SSU_eukaryote_rRNA");
        assert_eq!(
            DbSource::Ssu18S.archive_url(),
            "https://ftp.ncbi.nlm.nih.gov/blast/db/SSU_eukaryote_rRNA.tar.gz"
        );
    }

    #[test]
    fn test_install_marker_probe() {
        let blast_dir = Path::new("tests/data/project/BLAST");
        assert!(DbSource::Mito.is_installed(blast_dir));
        assert!(!DbSource::Ssu18S.is_installed(blast_dir));
        assert_eq!(
            DbSource::Mito.db_path(blast_dir),
            PathBuf::from("tests/data/project/BLAST/mito")
        );
    }

    #[test]
    fn test_ensure_installed_skips_when_present() {
        // marker present: must return without touching the network
        let blast_dir = Path::new("tests/data/project/BLAST");
        let installed = DbSource::Mito.ensure_installed(blast_dir).unwrap();
        assert!(!installed);
    }
}
