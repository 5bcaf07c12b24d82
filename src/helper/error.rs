use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input directory does not exist: {0}")]
    InputDirNotFound(String),
    #[error("Input path is not a valid directory: {0}")]
    NotADirectory(String),
    #[error("Aligned directory not found: {0}. Run the align stage first.")]
    AlignedDirNotFound(String),
    #[error("Treefiles directory not found: {0}. Run the tree stage first.")]
    TreefilesDirNotFound(String),
    #[error("No 'decorate_tree.py' script found at: {0}")]
    RenderScriptNotFound(String),
    #[error("Invalid database source '{0}'. Choose 'mito' or '18S'.")]
    UnknownDbSource(String),
    #[error("No taxonomy lineage found for accession: {0}")]
    LineageNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to serialize report: {0}")]
    ReportSerialization(#[from] serde_json::Error),
    #[error("Failed to write matrix: {0}")]
    MatrixWrite(#[from] csv::Error),
}
