use crate::error::{JasparError, Result};
use crate::types::{pfm_from_rows, Motif};
use std::fs;
use std::iter::Peekable;

/// The JASPAR 2024 CORE non-redundant PFM dump.
pub const JASPAR_CORE_URL: &str =
    "https://jaspar.elixir.no/download/data/2024/CORE/JASPAR2024_CORE_non-redundant_pfms_jaspar.txt";

/// Advances the iterator until a `>` header line is found
fn skip_until_header<'a, I>(lines: &mut Peekable<I>)
where
    I: Iterator<Item = &'a str>,
{
    while let Some(line) = lines.peek() {
        if line.trim_start().starts_with('>') {
            break;
        }
        lines.next();
    }
}

/// Parses one `{symbol}  [ counts... ]` matrix row
fn parse_count_row(line: &str, motif_id: &str) -> Result<(char, Vec<f64>)> {
    let trimmed = line.trim();
    let symbol = trimmed
        .chars()
        .next()
        .ok_or_else(|| JasparError::invalid_file_format(format!("empty matrix row in {motif_id}")))?
        .to_ascii_uppercase();

    let open = trimmed.find('[').ok_or_else(|| {
        JasparError::invalid_file_format(format!("missing '[' in matrix row of {motif_id}"))
    })?;
    let close = trimmed.rfind(']').ok_or_else(|| {
        JasparError::invalid_file_format(format!("missing ']' in matrix row of {motif_id}"))
    })?;
    if close < open {
        return Err(JasparError::invalid_file_format(format!(
            "malformed matrix row in {motif_id}"
        )));
    }

    let counts = trimmed[open + 1..close]
        .split_whitespace()
        .map(|value| {
            value.parse::<f64>().map_err(|e| {
                JasparError::invalid_file_format(format!(
                    "invalid matrix value '{value}' in {motif_id}: {e}"
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok((symbol, counts))
}

/// Parses a single motif block from the iterator
fn parse_motif_block<'a, I>(lines: &mut Peekable<I>) -> Result<Option<Motif>>
where
    I: Iterator<Item = &'a str>,
{
    let header = match lines.next() {
        Some(line) if line.trim_start().starts_with('>') => line.trim(),
        _ => return Ok(None),
    };

    let rest = header.trim_start_matches('>');
    let (id_part, tf_name) = rest.split_once('\t').ok_or_else(|| {
        JasparError::invalid_file_format(format!("missing TF name in header '{header}'"))
    })?;
    let motif_id = id_part
        .split_whitespace()
        .next()
        .ok_or_else(|| {
            JasparError::invalid_file_format(format!("missing motif ID in header '{header}'"))
        })?
        .to_string();
    let tf_name = tf_name.trim().to_string();

    // One row per nucleotide, in any order, duplicates rejected.
    let mut rows: [Option<Vec<f64>>; 4] = [None, None, None, None];
    for _ in 0..4 {
        let line = loop {
            match lines.next() {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => {
                    return Err(JasparError::invalid_file_format(format!(
                        "truncated matrix for {motif_id}"
                    )))
                }
            }
        };
        let (symbol, counts) = parse_count_row(line, &motif_id)?;
        let slot = match symbol {
            'A' => 0,
            'C' => 1,
            'G' => 2,
            'T' => 3,
            other => {
                return Err(JasparError::invalid_file_format(format!(
                    "unexpected row label '{other}' in {motif_id}"
                )))
            }
        };
        if rows[slot].is_some() {
            return Err(JasparError::invalid_file_format(format!(
                "duplicate row '{symbol}' in {motif_id}"
            )));
        }
        rows[slot] = Some(counts);
    }

    let [Some(a), Some(c), Some(g), Some(t)] = rows else {
        return Err(JasparError::invalid_file_format(format!(
            "incomplete matrix for {motif_id}"
        )));
    };
    let pfm = pfm_from_rows(a, c, g, t)
        .map_err(|e| JasparError::invalid_file_format(format!("motif {motif_id}: {e}")))?;

    Ok(Some(Motif::new(motif_id, tf_name, pfm)))
}

/// Parses a JASPAR flat text dump into motif records.
///
/// Each block starts with a `>{id}\t{TF name}` header followed by four
/// count rows, one per nucleotide. A malformed block fails the whole parse
/// with a message naming the motif.
///
/// # Errors
/// * `JasparError::InvalidFileFormat` - On any malformed block, or if the
///   text contains no motifs at all
pub fn parse_motif_db(text: &str) -> Result<Vec<Motif>> {
    let mut lines = text.lines().peekable();
    let mut motifs = Vec::new();

    skip_until_header(&mut lines);
    while let Some(motif) = parse_motif_block(&mut lines)? {
        motifs.push(motif);
        skip_until_header(&mut lines);
    }

    if motifs.is_empty() {
        return Err(JasparError::invalid_file_format("no motifs found"));
    }
    Ok(motifs)
}

/// Reads motif records from a JASPAR dump file on disk
///
/// # Errors
/// * `JasparError::Io` - If the file cannot be opened or read
/// * `JasparError::InvalidFileFormat` - If the dump is malformed
pub fn load_motif_db(filename: &str) -> Result<Vec<Motif>> {
    let text = fs::read_to_string(filename)?;
    parse_motif_db(&text)
}

/// Downloads and parses a JASPAR dump from a URL.
///
/// This is the one-time bootstrap load; it blocks until the download
/// completes and is meant to run before any request is served.
///
/// # Errors
/// * `JasparError::Http` - If the download fails or the server does not
///   answer with a success status
/// * `JasparError::InvalidFileFormat` - If the dump is malformed
pub fn fetch_motif_db(url: &str) -> Result<Vec<Motif>> {
    let text = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    parse_motif_db(&text)
}

/// Loads motif records from either a local path or an `http(s)://` URL
pub fn read_motif_source(path_or_url: &str) -> Result<Vec<Motif>> {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        fetch_motif_db(path_or_url)
    } else {
        load_motif_db(path_or_url)
    }
}
