use once_cell::sync::Lazy;
use regex::Regex;

/// Lines scanned past the hit header for its `Length=` field.
const LENGTH_LOOKAHEAD: usize = 10;
/// Lines scanned past the hit header for score and percent identity.
const SCORE_LOOKAHEAD: usize = 20;

static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Score\s*=\s*([\d,]+)").unwrap());
static IDENTITIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Identities\s*=\s*\d+/\d+\s+\((\d+)%\)").unwrap());

/// Best hit scraped for one query block of a blastn pairwise report. Fields
/// the report did not yield stay `None`; scraping never fails a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastHit {
    pub query_id: String,
    pub description: String,
    pub score: Option<u32>,
    pub length: Option<u32>,
    pub percent_identity: Option<u32>,
}

/// Lenient best-effort scrape of blastn's human-readable report.
///
/// A `Query=` line opens a block; after the significant-alignments banner the
/// first `>` line is the hit header. The description may continue on the next
/// line, the subject length is taken from the first `Length=` within
/// `LENGTH_LOOKAHEAD` lines, and score / percent identity are regex-matched
/// within `SCORE_LOOKAHEAD` lines, stopping as soon as both are found. Only
/// the first hit per query is kept; queries without a hit contribute nothing.
pub fn parse_report(text: &str) -> Vec<BlastHit> {
    let lines: Vec<&str> = text.lines().collect();
    let mut hits = Vec::new();
    let mut query: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("Query=") {
            query = Some(rest.trim().trim_start_matches('>').to_string());
        }
        if query.is_some() && line.starts_with("Sequences producing significant alignments:") {
            for j in (i + 1)..lines.len() {
                if let Some(header) = lines[j].strip_prefix('>') {
                    let mut description = header.trim().to_string();
                    if let Some(next) = lines.get(j + 1) {
                        if !next.trim().is_empty()
                            && !next.starts_with("Query=")
                            && !next.starts_with('>')
                        {
                            description.push(' ');
                            description.push_str(next.trim());
                        }
                    }
                    let (score, percent_identity) = scan_score(&lines, j);
                    hits.push(BlastHit {
                        query_id: query.take().unwrap_or_default(),
                        description,
                        score,
                        length: scan_length(&lines, j),
                        percent_identity,
                    });
                    break;
                }
            }
            query = None;
        }
    }
    hits
}

fn scan_length(lines: &[&str], from: usize) -> Option<u32> {
    for line in lines.iter().skip(from).take(LENGTH_LOOKAHEAD) {
        if let Some(value) = line.trim().strip_prefix("Length=") {
            return value.trim().parse().ok();
        }
    }
    None
}

fn scan_score(lines: &[&str], from: usize) -> (Option<u32>, Option<u32>) {
    let mut score = None;
    let mut percent_identity = None;
    for line in lines.iter().skip(from).take(SCORE_LOOKAHEAD) {
        if let Some(caps) = SCORE_RE.captures(line) {
            score = caps[1].replace(',', "").parse().ok();
        }
        if let Some(caps) = IDENTITIES_RE.captures(line) {
            percent_identity = caps[1].parse().ok();
        }
        if score.is_some() && percent_identity.is_some() {
            break;
        }
    }
    (score, percent_identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
BLASTN 2.14.0+

Query= >q1 some sample sequence

Length=420

Sequences producing significant alignments:          (Bits)  Value

>AB123456.1 Paramecium tetraurelia strain d4-2
mitochondrion, complete genome
Length=350

 Score = 120 bits (62),  Expect = 3e-25
 Identities = 45/50 (90%), Gaps = 0/50 (0%)
 Strand=Plus/Plus

Query= q2_no_hits

***** No hits found *****

Query= q3

Sequences producing significant alignments:          (Bits)  Value

>XY999999.9 Tetrahymena thermophila

Length=1200

 Score = 2,040 bits (1104),  Expect = 0.0
 Identities = 1104/1104 (100%), Gaps = 0/1104 (0%)
";

    #[test]
    fn test_parse_report_first_hit_per_query() {
        let hits = parse_report(REPORT);
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.query_id, "q1 some sample sequence");
        assert_eq!(
            first.description,
            "AB123456.1 Paramecium tetraurelia strain d4-2 mitochondrion, complete genome"
        );
        assert_eq!(first.length, Some(350));
        assert_eq!(first.score, Some(120));
        assert_eq!(first.percent_identity, Some(90));

        let second = &hits[1];
        assert_eq!(second.query_id, "q3");
        assert_eq!(second.description, "XY999999.9 Tetrahymena thermophila");
        assert_eq!(second.length, Some(1200));
        assert_eq!(second.score, Some(2040));
        assert_eq!(second.percent_identity, Some(100));
    }

    #[test]
    fn test_hitless_query_contributes_no_row() {
        let hits = parse_report(REPORT);
        assert!(hits.iter().all(|h| h.query_id != "q2_no_hits"));
    }

    #[test]
    fn test_missing_fields_are_absent_not_errors() {
        let report = "\
Query= q1

Sequences producing significant alignments:

>ZZ000001.1 unknown organism
";
        let hits = parse_report(report);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "ZZ000001.1 unknown organism");
        assert_eq!(hits[0].score, None);
        assert_eq!(hits[0].length, None);
        assert_eq!(hits[0].percent_identity, None);
    }

    #[test]
    fn test_length_outside_window_is_ignored() {
        let filler = "filler\n".repeat(10);
        let report = format!(
            "Query= q1\n\nSequences producing significant alignments:\n\n>AA111111.1 hit\n{}Length=350\n",
            filler
        );
        let hits = parse_report(&report);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].length, None);
    }

    #[test]
    fn test_score_scan_stops_after_both_found() {
        // a second, better-looking score further down must not overwrite the first
        let report = "\
Query= q1

Sequences producing significant alignments:

>AA111111.1 hit
Length=100

 Score = 50 bits (25),  Expect = 1e-05
 Identities = 20/25 (80%), Gaps = 0/25 (0%)

 Score = 999 bits (500),  Expect = 0.0
 Identities = 500/500 (100%), Gaps = 0/500 (0%)
";
        let hits = parse_report(report);
        assert_eq!(hits[0].score, Some(50));
        assert_eq!(hits[0].percent_identity, Some(80));
    }

    #[test]
    fn test_report_fixture_file() {
        let text = std::fs::read_to_string("tests/data/project/BLAST_results/sample1_b.txt")
            .unwrap();
        let hits = parse_report(&text);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].length, Some(350));
    }
}
