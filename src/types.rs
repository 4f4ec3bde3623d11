use crate::error::{JasparError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// The four nucleotide symbols, in the fixed column order of every PFM.
pub const NUCLEOTIDES: [&str; 4] = ["A", "C", "G", "T"];

/// Represents a Position Frequency Matrix (PFM)
/// Stored as a DataFrame with columns A, C, G, T, one row per motif position
pub type Pfm = DataFrame;

/// A PFM whose rows have been rescaled to per-position probabilities
pub type NormalizedPfm = DataFrame;

/// Raw JSON object as received in create/update request bodies.
/// Key order is preserved so it can be checked against [`NUCLEOTIDES`].
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A single motif record: JASPAR identifier, transcription factor name and
/// its position frequency matrix.
#[derive(Debug, Clone)]
pub struct Motif {
    pub motif_id: String,
    pub tf_name: String,
    pub pfm: Pfm,
}

/// Serializable form of a motif, with the wire names used by the JASPAR
/// JSON payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotifRecord {
    pub motif_id: String,
    #[serde(rename = "TF_name")]
    pub tf_name: String,
    #[serde(rename = "PFM")]
    pub pfm: PfmRows,
}

/// Per-nucleotide count rows of a PFM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfmRows {
    #[serde(rename = "A")]
    pub a: Vec<f64>,
    #[serde(rename = "C")]
    pub c: Vec<f64>,
    #[serde(rename = "G")]
    pub g: Vec<f64>,
    #[serde(rename = "T")]
    pub t: Vec<f64>,
}

/// Body of a create request. The matrix arrives as a raw JSON object and is
/// validated by [`pfm_from_json`] before any record is built.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMotifRequest {
    pub motif_id: String,
    #[serde(rename = "TF_name")]
    pub tf_name: String,
    #[serde(rename = "PFM")]
    pub pfm: JsonMap,
}

/// Body of an update request. Both fields are independently optional;
/// omitted fields leave the stored motif unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMotifRequest {
    #[serde(rename = "TF_name")]
    pub tf_name: Option<String>,
    #[serde(rename = "PFM")]
    pub pfm: Option<JsonMap>,
}

impl Motif {
    pub fn new(motif_id: impl Into<String>, tf_name: impl Into<String>, pfm: Pfm) -> Self {
        Motif {
            motif_id: motif_id.into(),
            tf_name: tf_name.into(),
            pfm,
        }
    }

    /// Number of positions in this motif's matrix
    pub fn len(&self) -> usize {
        self.pfm.height()
    }

    pub fn is_empty(&self) -> bool {
        self.pfm.height() == 0
    }

    /// Converts the motif into its serializable record form
    pub fn to_record(&self) -> Result<MotifRecord> {
        Ok(MotifRecord {
            motif_id: self.motif_id.clone(),
            tf_name: self.tf_name.clone(),
            pfm: pfm_to_rows(&self.pfm)?,
        })
    }

    pub fn from_record(record: MotifRecord) -> Result<Self> {
        let MotifRecord {
            motif_id,
            tf_name,
            pfm,
        } = record;
        Ok(Motif {
            motif_id,
            tf_name,
            pfm: pfm_from_rows(pfm.a, pfm.c, pfm.g, pfm.t)?,
        })
    }
}

/// Builds a PFM DataFrame from the four per-nucleotide count rows.
///
/// # Errors
/// * `JasparError::InvalidPfm` - If the rows differ in length or are empty
/// * `JasparError::DataError` - If the DataFrame cannot be created
pub fn pfm_from_rows(a: Vec<f64>, c: Vec<f64>, g: Vec<f64>, t: Vec<f64>) -> Result<Pfm> {
    if a.len() != c.len() || c.len() != g.len() || g.len() != t.len() {
        return Err(JasparError::invalid_pfm(
            "nucleotide rows must have the same length",
        ));
    }
    if a.is_empty() {
        return Err(JasparError::invalid_pfm("nucleotide rows must not be empty"));
    }

    DataFrame::new(vec![
        Column::new("A".into(), a),
        Column::new("C".into(), c),
        Column::new("G".into(), g),
        Column::new("T".into(), t),
    ])
    .map_err(|e| JasparError::data(e.to_string()))
}

/// Validates a raw JSON matrix and builds a PFM from it.
///
/// The object must carry exactly the keys A, C, G, T in that order, every
/// value must be an array of numbers, and all four arrays must share the
/// same non-zero length.
///
/// # Errors
/// * `JasparError::InvalidPfm` - On any key, type or shape violation, with
///   a sub-reason in the message
pub fn pfm_from_json(raw: &JsonMap) -> Result<Pfm> {
    let keys: Vec<&str> = raw.keys().map(|k| k.as_str()).collect();
    if keys != NUCLEOTIDES {
        return Err(JasparError::invalid_pfm("incorrect keys"));
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(4);
    for value in raw.values() {
        let list = value
            .as_array()
            .ok_or_else(|| JasparError::invalid_pfm("non-numeric values"))?;
        let counts = list
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| JasparError::invalid_pfm("non-numeric values"))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(counts);
    }

    let mut rows = rows.into_iter();
    let (a, c, g, t) = (
        rows.next().unwrap_or_default(),
        rows.next().unwrap_or_default(),
        rows.next().unwrap_or_default(),
        rows.next().unwrap_or_default(),
    );
    pfm_from_rows(a, c, g, t)
}

/// Extracts one nucleotide column of a PFM as a plain vector
pub fn column_values(pfm: &Pfm, symbol: &str) -> Result<Vec<f64>> {
    Ok(pfm
        .column(symbol)
        .map_err(|e| JasparError::data(e.to_string()))?
        .f64()
        .map_err(|e| JasparError::data(e.to_string()))?
        .into_no_null_iter()
        .collect())
}

/// Converts a PFM back into its four count rows
pub fn pfm_to_rows(pfm: &Pfm) -> Result<PfmRows> {
    Ok(PfmRows {
        a: column_values(pfm, "A")?,
        c: column_values(pfm, "C")?,
        g: column_values(pfm, "G")?,
        t: column_values(pfm, "T")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: serde_json::Value) -> JsonMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn builds_pfm_from_valid_json() {
        let raw = as_map(json!({
            "A": [1, 0],
            "C": [0, 1],
            "G": [0, 0],
            "T": [0, 0],
        }));
        let pfm = pfm_from_json(&raw).unwrap();
        assert_eq!(pfm.height(), 2);
        assert_eq!(column_values(&pfm, "A").unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn rejects_wrong_key_order() {
        let raw = as_map(json!({
            "A": [1], "C": [1], "T": [1], "G": [1],
        }));
        let err = pfm_from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("incorrect keys"), "{err}");
    }

    #[test]
    fn rejects_missing_key() {
        let raw = as_map(json!({
            "A": [1], "C": [1], "G": [1],
        }));
        assert!(pfm_from_json(&raw).is_err());
    }

    #[test]
    fn rejects_non_numeric_values() {
        let raw = as_map(json!({
            "A": [1], "C": ["x"], "G": [1], "T": [1],
        }));
        let err = pfm_from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("non-numeric"), "{err}");
    }

    #[test]
    fn rejects_unequal_row_lengths() {
        let raw = as_map(json!({
            "A": [1, 2], "C": [1], "G": [1, 2], "T": [1, 2],
        }));
        let err = pfm_from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("same length"), "{err}");
    }

    #[test]
    fn rejects_empty_rows() {
        let raw = as_map(json!({
            "A": [], "C": [], "G": [], "T": [],
        }));
        assert!(pfm_from_json(&raw).is_err());
    }

    #[test]
    fn record_round_trip_preserves_counts() {
        let pfm = pfm_from_rows(
            vec![4.0, 19.0],
            vec![16.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        )
        .unwrap();
        let motif = Motif::new("MA0004.1", "Arnt", pfm);
        let record = motif.to_record().unwrap();
        assert_eq!(record.pfm.a, vec![4.0, 19.0]);

        let back = Motif::from_record(record).unwrap();
        assert_eq!(back.motif_id, "MA0004.1");
        assert_eq!(back.len(), 2);
    }
}
