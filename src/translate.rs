use crate::error::{JasparError, Result};
use itertools::Itertools;
use phf::phf_map;

/// Standard genetic code: each amino-acid single-letter code maps to its
/// synonymous DNA codons. Stop codons are not modeled.
static GENETIC_CODE: phf::Map<char, &'static [&'static str]> = phf_map! {
    'I' => &["ATA", "ATC", "ATT"],
    'M' => &["ATG"],
    'T' => &["ACA", "ACC", "ACG", "ACT"],
    'N' => &["AAC", "AAT"],
    'K' => &["AAA", "AAG"],
    'S' => &["AGC", "AGT", "TCA", "TCC", "TCG", "TCT"],
    'R' => &["AGA", "AGG", "CGA", "CGC", "CGG", "CGT"],
    'L' => &["CTA", "CTC", "CTG", "CTT", "TTA", "TTG"],
    'P' => &["CCA", "CCC", "CCG", "CCT"],
    'H' => &["CAC", "CAT"],
    'Q' => &["CAA", "CAG"],
    'V' => &["GTA", "GTC", "GTG", "GTT"],
    'A' => &["GCA", "GCC", "GCG", "GCT"],
    'D' => &["GAC", "GAT"],
    'E' => &["GAA", "GAG"],
    'G' => &["GGA", "GGC", "GGG", "GGT"],
    'F' => &["TTC", "TTT"],
    'Y' => &["TAC", "TAT"],
    'C' => &["TGC", "TGT"],
    'W' => &["TGG"],
};

/// How to handle letters that are not in the genetic-code table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslationMode {
    /// Skip unknown letters silently. The produced DNA strings are then
    /// shorter than three times the protein length.
    #[default]
    Lenient,
    /// Fail with `UnknownResidue` on the first unknown letter.
    Strict,
}

/// Returns the synonymous codons for one amino-acid letter, if known
pub fn codons_for(residue: char) -> Option<&'static [&'static str]> {
    GENETIC_CODE.get(&residue).copied()
}

/// Expands an amino-acid sequence into every DNA sequence that encodes it.
///
/// The result is the Cartesian product of the per-residue codon choices,
/// in residue order. It grows multiplicatively with sequence length, so
/// callers should only pass short sequences.
///
/// # Errors
/// * `JasparError::UnknownResidue` - In strict mode, if a letter has no
///   entry in the genetic-code table
pub fn back_translate(protein: &str, mode: TranslationMode) -> Result<Vec<String>> {
    let mut codon_sets: Vec<&'static [&'static str]> = Vec::with_capacity(protein.len());
    for residue in protein.chars() {
        match codons_for(residue) {
            Some(codons) => codon_sets.push(codons),
            None if mode == TranslationMode::Strict => {
                return Err(JasparError::UnknownResidue(residue));
            }
            None => {}
        }
    }

    // The product of zero codon sets is the single empty sequence.
    if codon_sets.is_empty() {
        return Ok(vec![String::new()]);
    }

    Ok(codon_sets
        .into_iter()
        .map(|codons| codons.iter().copied())
        .multi_cartesian_product()
        .map(|codons| codons.concat())
        .collect())
}
