use crate::error::{JasparError, Result};

/// Warning attached to queries whose sequence contained U instead of T.
pub const RNA_WARNING: &str = "sequence may be RNA, U replaced with T";

/// Warning attached to queries whose sequence is not a nucleotide alphabet.
pub const PROTEIN_WARNING: &str = "sequence may be a protein, translating to DNA";

/// Letters that are neither unambiguous amino-acid codes nor nucleotides.
const REJECTED_LETTERS: [char; 4] = ['B', 'J', 'O', 'Z'];

/// The alphabet a query sequence was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Dna,
    Rna,
    Protein,
}

/// A classified query sequence: its kind, the uppercased (and for RNA,
/// U-to-T rewritten) form, and an optional warning for the caller.
#[derive(Debug, Clone)]
pub struct ClassifiedSequence {
    pub kind: SequenceKind,
    pub normalized: String,
    pub warning: Option<String>,
}

/// Decides whether a raw query string is DNA, RNA or a protein sequence.
///
/// Rules are applied in order: the string must be entirely letters, it is
/// uppercased, the ambiguous letters B/J/O/Z are rejected, a mix of T and U
/// is rejected, then the narrowest matching alphabet wins. RNA sequences
/// come back with U rewritten to T so they can be scored directly.
///
/// # Errors
/// * `JasparError::NonAlphabetic` - Empty input or any non-letter character
/// * `JasparError::AmbiguousLetter` - Any of B, J, O, Z after uppercasing
/// * `JasparError::MixedAlphabet` - Both T and U present
pub fn classify(raw: &str) -> Result<ClassifiedSequence> {
    if raw.is_empty() || !raw.chars().all(char::is_alphabetic) {
        return Err(JasparError::NonAlphabetic);
    }

    let upper = raw.to_uppercase();

    if let Some(bad) = upper.chars().find(|c| REJECTED_LETTERS.contains(c)) {
        return Err(JasparError::AmbiguousLetter(bad));
    }
    if upper.contains('T') && upper.contains('U') {
        return Err(JasparError::MixedAlphabet);
    }

    if upper.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T')) {
        Ok(ClassifiedSequence {
            kind: SequenceKind::Dna,
            normalized: upper,
            warning: None,
        })
    } else if upper.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'U')) {
        Ok(ClassifiedSequence {
            kind: SequenceKind::Rna,
            normalized: upper.replace('U', "T"),
            warning: Some(RNA_WARNING.to_string()),
        })
    } else {
        Ok(ClassifiedSequence {
            kind: SequenceKind::Protein,
            normalized: upper,
            warning: Some(PROTEIN_WARNING.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_dna_without_warning() {
        let result = classify("acgt").unwrap();
        assert_eq!(result.kind, SequenceKind::Dna);
        assert_eq!(result.normalized, "ACGT");
        assert!(result.warning.is_none());
    }

    #[test]
    fn classifies_rna_and_rewrites_u() {
        let result = classify("ACGU").unwrap();
        assert_eq!(result.kind, SequenceKind::Rna);
        assert_eq!(result.normalized, "ACGT");
        assert_eq!(result.warning.as_deref(), Some(RNA_WARNING));
    }

    #[test]
    fn classifies_protein_with_warning() {
        let result = classify("MIVK").unwrap();
        assert_eq!(result.kind, SequenceKind::Protein);
        assert_eq!(result.normalized, "MIVK");
        assert_eq!(result.warning.as_deref(), Some(PROTEIN_WARNING));
    }

    #[test]
    fn rejects_non_letters_and_empty_input() {
        assert!(matches!(classify("ACG1"), Err(JasparError::NonAlphabetic)));
        assert!(matches!(classify("AC GT"), Err(JasparError::NonAlphabetic)));
        assert!(matches!(classify(""), Err(JasparError::NonAlphabetic)));
    }

    #[test]
    fn rejects_ambiguous_letters() {
        assert!(matches!(
            classify("ACGB"),
            Err(JasparError::AmbiguousLetter('B'))
        ));
        assert!(matches!(
            classify("acgz"),
            Err(JasparError::AmbiguousLetter('Z'))
        ));
    }

    #[test]
    fn rejects_mixed_t_and_u() {
        assert!(matches!(classify("ACGUT"), Err(JasparError::MixedAlphabet)));
    }

    #[test]
    fn a_u_only_alphabet_is_rna_not_protein() {
        let result = classify("AUGC").unwrap();
        assert_eq!(result.kind, SequenceKind::Rna);
        assert_eq!(result.normalized, "ATGC");
    }
}
