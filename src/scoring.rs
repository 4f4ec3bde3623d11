use crate::error::{JasparError, Result};
use crate::sequence::{classify, SequenceKind};
use crate::store::MotifStore;
use crate::translate::{back_translate, TranslationMode};
use crate::types::{column_values, Motif, NormalizedPfm, Pfm};
use polars::lazy::dsl::*;
use polars::prelude::*;
use serde::Serialize;

/// Score of one motif against a query sequence
#[derive(Debug, Clone, Serialize)]
pub struct MotifScore {
    pub motif_id: String,
    pub score: f64,
}

/// Ranked scores for one query, highest first
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub sequence: String,
    pub motifs_scored: usize,
    pub scores: Vec<MotifScore>,
}

/// Outcome of a scoring query after sequence classification.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The sequence was DNA or RNA and was scored against the store.
    Ranked {
        warning: Option<String>,
        report: ScoreReport,
    },
    /// The sequence was a protein. The caller gets every candidate DNA
    /// sequence and must resubmit one of them to obtain scores.
    Candidates {
        warning: Option<String>,
        dna_sequences: Vec<String>,
    },
}

/// Rescales a PFM into per-position probabilities.
///
/// Every count is divided by the sum of the four counts at its position,
/// so each row of the result sums to 1.
///
/// # Errors
/// * `JasparError::DegenerateColumn` - If the four counts at some position
///   sum to zero, which would make the probabilities undefined
/// * `JasparError::DataError` - If the matrix arithmetic fails
pub fn normalize_pfm(pfm: &Pfm) -> Result<NormalizedPfm> {
    let a = column_values(pfm, "A")?;
    let c = column_values(pfm, "C")?;
    let g = column_values(pfm, "G")?;
    let t = column_values(pfm, "T")?;
    for position in 0..a.len() {
        if a[position] + c[position] + g[position] + t[position] == 0.0 {
            return Err(JasparError::DegenerateColumn { position });
        }
    }

    pfm.clone()
        .lazy()
        .with_column((col("A") + col("C") + col("G") + col("T")).alias("total"))
        .select([
            (col("A") / col("total")).alias("A"),
            (col("C") / col("total")).alias("C"),
            (col("G") / col("total")).alias("G"),
            (col("T") / col("total")).alias("T"),
        ])
        .collect()
        .map_err(|e| JasparError::data(e.to_string()))
}

/// Scores one DNA sequence against one normalized matrix of equal length:
/// the product over positions of the probability of the observed symbol.
///
/// The sequence must already be pure A/C/G/T; anything else is a contract
/// violation and comes back as a data error.
pub fn motif_score(sequence: &str, normalized: &NormalizedPfm) -> Result<f64> {
    let mut score = 1.0;
    for (position, symbol) in sequence.chars().enumerate() {
        let probabilities = normalized
            .column(symbol.to_string().as_str())
            .map_err(|_| JasparError::data(format!("symbol {symbol} is not a nucleotide")))?
            .f64()
            .map_err(|e| JasparError::data(e.to_string()))?;
        let probability = probabilities
            .get(position)
            .ok_or_else(|| JasparError::data(format!("no matrix row for position {position}")))?;
        score *= probability;
    }
    Ok(score)
}

/// Scores a DNA sequence against every motif of matching length and ranks
/// the results by descending score. Ties keep encounter order.
///
/// # Errors
/// * `JasparError::SequenceTooShort` / `JasparError::SequenceTooLong` - If
///   the sequence length falls outside the range spanned by the motifs
/// * `JasparError::NoMotifsOfLength` - If no motif has exactly the
///   sequence's length (including the empty-collection case)
pub fn score_sequence(sequence: &str, motifs: &[Motif]) -> Result<ScoreReport> {
    let sequence_length = sequence.len();

    let lengths = motifs.iter().map(Motif::len);
    let (min_length, max_length) = match (lengths.clone().min(), lengths.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => return Err(JasparError::NoMotifsOfLength(sequence_length)),
    };
    if sequence_length < min_length {
        return Err(JasparError::SequenceTooShort(min_length));
    }
    if sequence_length > max_length {
        return Err(JasparError::SequenceTooLong(max_length));
    }

    let mut scores = Vec::new();
    for motif in motifs {
        if motif.len() != sequence_length {
            continue;
        }
        let normalized = normalize_pfm(&motif.pfm)?;
        scores.push(MotifScore {
            motif_id: motif.motif_id.clone(),
            score: motif_score(sequence, &normalized)?,
        });
    }

    if scores.is_empty() {
        return Err(JasparError::NoMotifsOfLength(sequence_length));
    }

    scores.sort_by(|left, right| right.score.total_cmp(&left.score));
    Ok(ScoreReport {
        sequence: sequence.to_string(),
        motifs_scored: scores.len(),
        scores,
    })
}

/// Runs a full scoring query on a raw sequence string.
///
/// The sequence is classified first. DNA and RNA are scored against a
/// snapshot of the store; a protein sequence is back-translated and its
/// candidate DNA sequences are returned for manual resubmission.
pub fn score_query(
    raw: &str,
    store: &MotifStore,
    mode: TranslationMode,
) -> Result<QueryOutcome> {
    let classified = classify(raw)?;
    match classified.kind {
        SequenceKind::Protein => Ok(QueryOutcome::Candidates {
            warning: classified.warning,
            dna_sequences: back_translate(&classified.normalized, mode)?,
        }),
        SequenceKind::Dna | SequenceKind::Rna => {
            let report = score_sequence(&classified.normalized, &store.all())?;
            Ok(QueryOutcome::Ranked {
                warning: classified.warning,
                report,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{pfm_from_rows, pfm_to_rows};

    const TOLERANCE: f64 = 1e-12;

    fn motif(motif_id: &str, a: Vec<f64>, c: Vec<f64>, g: Vec<f64>, t: Vec<f64>) -> Motif {
        Motif::new(motif_id, "testTF", pfm_from_rows(a, c, g, t).unwrap())
    }

    #[test]
    fn normalized_rows_sum_to_one() {
        let pfm = pfm_from_rows(
            vec![800.0, 807.0, 52.0],
            vec![68.0, 52.0, 29.0],
            vec![47.0, 44.0, 22.0],
            vec![85.0, 98.0, 898.0],
        )
        .unwrap();
        let rows = pfm_to_rows(&normalize_pfm(&pfm).unwrap()).unwrap();
        for position in 0..3 {
            let total =
                rows.a[position] + rows.c[position] + rows.g[position] + rows.t[position];
            assert!((total - 1.0).abs() < TOLERANCE, "position {position}: {total}");
        }
    }

    #[test]
    fn normalization_is_idempotent_on_probabilities() {
        let pfm = pfm_from_rows(
            vec![3.0, 1.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        )
        .unwrap();
        let once = normalize_pfm(&pfm).unwrap();
        let twice = normalize_pfm(&once).unwrap();
        let first = pfm_to_rows(&once).unwrap();
        let second = pfm_to_rows(&twice).unwrap();
        for position in 0..2 {
            assert!((first.a[position] - second.a[position]).abs() < TOLERANCE);
            assert!((first.t[position] - second.t[position]).abs() < TOLERANCE);
        }
    }

    #[test]
    fn rejects_all_zero_columns() {
        let pfm = pfm_from_rows(
            vec![1.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        )
        .unwrap();
        let err = normalize_pfm(&pfm).unwrap_err();
        assert!(matches!(
            err,
            JasparError::DegenerateColumn { position: 1 }
        ));
    }

    #[test]
    fn scores_a_perfect_match_as_one() {
        let motifs = vec![motif(
            "MA0001.1",
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        )];
        let report = score_sequence("AC", &motifs).unwrap();
        assert_eq!(report.motifs_scored, 1);
        assert!((report.scores[0].score - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn ranks_scores_in_descending_order() {
        let motifs = vec![
            motif(
                "MA0001.1",
                vec![1.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 1.0],
            ),
            motif(
                "MA0002.1",
                vec![8.0, 0.0],
                vec![0.0, 8.0],
                vec![1.0, 1.0],
                vec![1.0, 1.0],
            ),
        ];
        let report = score_sequence("AC", &motifs).unwrap();
        let ids: Vec<&str> = report.scores.iter().map(|s| s.motif_id.as_str()).collect();
        assert_eq!(ids, vec!["MA0002.1", "MA0001.1"]);
        assert!(report.scores[0].score > report.scores[1].score);
    }

    #[test]
    fn tied_scores_keep_encounter_order() {
        let uniform = |id: &str| {
            motif(
                id,
                vec![1.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 1.0],
            )
        };
        let motifs = vec![uniform("MA0003.1"), uniform("MA0001.1"), uniform("MA0002.1")];
        let report = score_sequence("AC", &motifs).unwrap();
        let ids: Vec<&str> = report.scores.iter().map(|s| s.motif_id.as_str()).collect();
        assert_eq!(ids, vec!["MA0003.1", "MA0001.1", "MA0002.1"]);
    }

    #[test]
    fn reports_length_bound_violations() {
        let motifs = vec![motif(
            "MA0001.1",
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        )];
        assert!(matches!(
            score_sequence("A", &motifs),
            Err(JasparError::SequenceTooShort(2))
        ));
        assert!(matches!(
            score_sequence("ACG", &motifs),
            Err(JasparError::SequenceTooLong(2))
        ));
    }

    #[test]
    fn reports_length_gaps_inside_the_range() {
        let motifs = vec![
            motif("MA0001.1", vec![1.0], vec![1.0], vec![1.0], vec![1.0]),
            motif(
                "MA0002.1",
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
            ),
        ];
        assert!(matches!(
            score_sequence("AC", &motifs),
            Err(JasparError::NoMotifsOfLength(2))
        ));
    }

    #[test]
    fn empty_collection_reports_no_motifs() {
        assert!(matches!(
            score_sequence("ACGT", &[]),
            Err(JasparError::NoMotifsOfLength(4))
        ));
    }

    #[test]
    fn scoring_is_deterministic() {
        let motifs = vec![
            motif(
                "MA0001.1",
                vec![4.0, 19.0],
                vec![16.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 0.0],
            ),
            motif(
                "MA0002.1",
                vec![3.0, 0.0],
                vec![8.0, 0.0],
                vec![2.0, 23.0],
                vec![11.0, 1.0],
            ),
        ];
        let first = score_sequence("AG", &motifs).unwrap();
        let second = score_sequence("AG", &motifs).unwrap();
        for (left, right) in first.scores.iter().zip(second.scores.iter()) {
            assert_eq!(left.motif_id, right.motif_id);
            assert_eq!(left.score, right.score);
        }
    }
}
