pub mod blast_helper;
pub mod entrez;
pub mod error;
pub mod iqtree;
pub mod layout;
pub mod logging;
pub mod mafft;
pub mod matrix;
pub mod report;
pub mod svg;

pub use error::PipelineError;
pub use layout::{ProjectLayout, sample_name};
pub use logging::RunLogger;
pub use report::StageReport;
