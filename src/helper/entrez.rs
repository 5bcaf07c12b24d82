use std::time::Duration;

use crate::helper::error::PipelineError;

pub const EUTILS_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Placeholder taxonomy recorded when a lookup fails, so one dead accession
/// never aborts a sample's matrix.
pub const NOT_FOUND_TAXON: &str = "Not Found";

/// Remote taxonomy lookup against NCBI Entrez. The e-mail is forwarded on
/// every request, as the E-utilities usage policy requires.
pub struct EntrezClient {
    email: String,
    client: reqwest::blocking::Client,
}

impl EntrezClient {
    pub fn new(email: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        EntrezClient {
            email: email.to_string(),
            client,
        }
    }

    /// Fetches the GenBank record for an accession and returns its taxonomy
    /// lineage, outermost rank first.
    pub fn fetch_taxonomy(&self, accession: &str) -> Result<Vec<String>, PipelineError> {
        let response = self
            .client
            .get(EUTILS_EFETCH_URL)
            .query(&[
                ("db", "nuccore"),
                ("id", accession),
                ("rettype", "gb"),
                ("retmode", "text"),
                ("tool", "phylopipe"),
                ("email", self.email.as_str()),
            ])
            .send()?
            .error_for_status()?;
        let record = response.text()?;
        parse_organism_lineage(&record)
            .ok_or_else(|| PipelineError::LineageNotFound(accession.to_string()))
    }

    /// Lookup with the "Not Found" fallback the matrix stage relies on.
    pub fn taxonomy_or_placeholder(&self, accession: &str) -> Vec<String> {
        match self.fetch_taxonomy(accession) {
            Ok(lineage) if !lineage.is_empty() => lineage,
            _ => vec![NOT_FOUND_TAXON.to_string()],
        }
    }
}

/// Accession token of a hit: the text before the first space of its
/// description line.
pub fn accession_of(description: &str) -> &str {
    description.split(' ').next().unwrap_or(description)
}

/// Extracts the semicolon-separated lineage from the indented block under a
/// GenBank record's `ORGANISM` line. The block runs until the line ending
/// with a period.
pub fn parse_organism_lineage(genbank: &str) -> Option<Vec<String>> {
    let mut lines = genbank.lines();
    while let Some(line) = lines.next() {
        if !line.trim_start().starts_with("ORGANISM") {
            continue;
        }
        let mut lineage = String::new();
        for continuation in lines.by_ref() {
            if !continuation.starts_with(' ') {
                break;
            }
            let part = continuation.trim();
            if part.is_empty() {
                break;
            }
            if !lineage.is_empty() {
                lineage.push(' ');
            }
            lineage.push_str(part);
            if part.ends_with('.') {
                break;
            }
        }
        let ranks: Vec<String> = lineage
            .trim_end_matches('.')
            .split(';')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        return if ranks.is_empty() { None } else { Some(ranks) };
    }
    None
}
