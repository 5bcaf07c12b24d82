use std::collections::HashMap;
use std::io::Write;

use crate::helper::blast_helper::BlastHit;

/// One joined row of a sample's data matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub query_id: String,
    pub taxonomy: Vec<String>,
    pub score: Option<u32>,
    pub length: Option<u32>,
    pub percent_identity: Option<u32>,
}

/// Per-sample table: taxonomy rank columns (width = deepest lineage across
/// the sample's queries) followed by the three hit-metadata columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMatrix {
    pub taxon_width: usize,
    pub rows: Vec<MatrixRow>,
}

impl DataMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Serializes as a tab-delimited table with a header row and the query
    /// identifier in the leading column. Absent values become empty cells;
    /// taxonomies shorter than the table width leave trailing cells empty.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let mut header = vec!["query_id".to_string()];
        for i in 1..=self.taxon_width {
            header.push(format!("taxon_{}", i));
        }
        header.push("score".to_string());
        header.push("length".to_string());
        header.push("percent_identity".to_string());
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.query_id.clone()];
            for i in 0..self.taxon_width {
                record.push(row.taxonomy.get(i).cloned().unwrap_or_default());
            }
            record.push(opt_cell(row.score));
            record.push(opt_cell(row.length));
            record.push(opt_cell(row.percent_identity));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_tsv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut buf = Vec::new();
        self.write_tsv(&mut buf)?;
        Ok(buf)
    }
}

fn opt_cell(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Inner-joins the parsed-hit table with the taxonomy table on the query
/// identifier: only queries present in both contribute a row. The taxonomy
/// width is sized over the whole taxonomy table, so a row dropped by the
/// join still widens the frame, as the original tool's tabular join did.
pub fn assemble(hits: &[BlastHit], taxonomies: &HashMap<String, Vec<String>>) -> DataMatrix {
    let taxon_width = taxonomies.values().map(|t| t.len()).max().unwrap_or(0);
    let rows = hits
        .iter()
        .filter_map(|hit| {
            taxonomies.get(&hit.query_id).map(|taxonomy| MatrixRow {
                query_id: hit.query_id.clone(),
                taxonomy: taxonomy.clone(),
                score: hit.score,
                length: hit.length,
                percent_identity: hit.percent_identity,
            })
        })
        .collect();
    DataMatrix { taxon_width, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query_id: &str, score: Option<u32>) -> BlastHit {
        BlastHit {
            query_id: query_id.to_string(),
            description: format!("ACC_{} some organism", query_id),
            score,
            length: Some(350),
            percent_identity: Some(90),
        }
    }

    #[test]
    fn test_inner_join_drops_unmatched_rows() {
        let hits = vec![hit("A", Some(120)), hit("B", Some(80))];
        let mut taxonomies = HashMap::new();
        taxonomies.insert("A".to_string(), vec!["Eukaryota".to_string()]);
        taxonomies.insert("C".to_string(), vec!["Bacteria".to_string()]);

        let matrix = assemble(&hits, &taxonomies);
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.rows[0].query_id, "A");
    }

    #[test]
    fn test_taxon_width_spans_all_queries() {
        let hits = vec![hit("A", None)];
        let mut taxonomies = HashMap::new();
        taxonomies.insert("A".to_string(), vec!["Eukaryota".to_string()]);
        taxonomies.insert(
            "B".to_string(),
            vec!["Eukaryota".to_string(), "Sar".to_string(), "Alveolata".to_string()],
        );

        let matrix = assemble(&hits, &taxonomies);
        assert_eq!(matrix.taxon_width, 3);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_tsv_shape_and_padding() {
        let hits = vec![hit("A", Some(120)), hit("B", None)];
        let mut taxonomies = HashMap::new();
        taxonomies.insert(
            "A".to_string(),
            vec!["Eukaryota".to_string(), "Sar".to_string()],
        );
        taxonomies.insert("B".to_string(), vec!["Not Found".to_string()]);

        let matrix = assemble(&hits, &taxonomies);
        let tsv = String::from_utf8(matrix.to_tsv_bytes().unwrap()).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(
            lines[0],
            "query_id\ttaxon_1\ttaxon_2\tscore\tlength\tpercent_identity"
        );
        assert_eq!(lines[1], "A\tEukaryota\tSar\t120\t350\t90");
        // short taxonomy leaves the trailing cell empty, absent score too
        assert_eq!(lines[2], "B\tNot Found\t\t\t350\t90");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_matrix_still_has_header() {
        let matrix = assemble(&[], &HashMap::new());
        let tsv = String::from_utf8(matrix.to_tsv_bytes().unwrap()).unwrap();
        assert_eq!(tsv, "query_id\tscore\tlength\tpercent_identity\n");
    }
}
