use crate::error::{JasparError, Result};
use crate::types::{pfm_from_json, CreateMotifRequest, Motif, UpdateMotifRequest};
use regex::Regex;
use std::sync::{LazyLock, RwLock};

/// JASPAR matrix identifier pattern: "MA", four digits, a dot, one digit.
static MOTIF_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^MA\d{4}\.\d$").expect("motif ID pattern is valid"));

/// Returns true if the given identifier matches the JASPAR matrix pattern
pub fn is_valid_motif_id(motif_id: &str) -> bool {
    MOTIF_ID_PATTERN.is_match(motif_id)
}

/// The shared in-memory motif database.
///
/// Records are kept in insertion order behind a read/write lock: request
/// handlers take snapshots for reads and scoring, while every mutation runs
/// as a single critical section.
#[derive(Debug, Default)]
pub struct MotifStore {
    motifs: RwLock<Vec<Motif>>,
}

impl MotifStore {
    pub fn new() -> Self {
        MotifStore {
            motifs: RwLock::new(Vec::new()),
        }
    }

    /// Builds a store from already-parsed records, preserving their order.
    ///
    /// Used for the one-time bootstrap load. Parser output is trusted here:
    /// only explicitly created motifs go through the ID format check.
    pub fn from_motifs(motifs: Vec<Motif>) -> Self {
        MotifStore {
            motifs: RwLock::new(motifs),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn exists(&self, motif_id: &str) -> bool {
        self.read().iter().any(|m| m.motif_id == motif_id)
    }

    /// Looks up one motif by its identifier
    ///
    /// # Errors
    /// * `JasparError::NotFound` - If no motif has the given identifier
    pub fn get(&self, motif_id: &str) -> Result<Motif> {
        self.read()
            .iter()
            .find(|m| m.motif_id == motif_id)
            .cloned()
            .ok_or_else(|| JasparError::NotFound(motif_id.to_string()))
    }

    /// Returns a snapshot of all motifs in insertion order
    pub fn all(&self) -> Vec<Motif> {
        self.read().clone()
    }

    /// Inserts a new motif.
    ///
    /// # Errors
    /// * `JasparError::DuplicateId` - If the identifier is already present
    /// * `JasparError::InvalidIdFormat` - If the identifier does not match
    ///   the `MA\d{4}.\d` pattern
    pub fn insert(&self, motif: Motif) -> Result<()> {
        let mut motifs = self.write();
        if motifs.iter().any(|m| m.motif_id == motif.motif_id) {
            return Err(JasparError::DuplicateId(motif.motif_id));
        }
        if !is_valid_motif_id(&motif.motif_id) {
            return Err(JasparError::InvalidIdFormat(motif.motif_id));
        }
        motifs.push(motif);
        Ok(())
    }

    /// Validates a create request and inserts the resulting motif.
    ///
    /// # Errors
    /// * `JasparError::InvalidPfm` - If the raw matrix fails validation
    /// * `JasparError::DuplicateId` / `JasparError::InvalidIdFormat` - As
    ///   for [`MotifStore::insert`]
    pub fn create(&self, request: CreateMotifRequest) -> Result<Motif> {
        let pfm = pfm_from_json(&request.pfm)?;
        let motif = Motif::new(request.motif_id, request.tf_name, pfm);
        self.insert(motif.clone())?;
        Ok(motif)
    }

    /// Applies an update request to an existing motif and returns the new
    /// record. Name and matrix are independently optional; a supplied
    /// matrix must pass validation before it replaces the stored one.
    ///
    /// # Errors
    /// * `JasparError::NotFound` - If no motif has the given identifier
    /// * `JasparError::InvalidPfm` - If the raw matrix fails validation
    pub fn update(&self, motif_id: &str, request: UpdateMotifRequest) -> Result<Motif> {
        let mut motifs = self.write();
        let motif = motifs
            .iter_mut()
            .find(|m| m.motif_id == motif_id)
            .ok_or_else(|| JasparError::NotFound(motif_id.to_string()))?;

        let new_pfm = match &request.pfm {
            Some(raw) => Some(pfm_from_json(raw)?),
            None => None,
        };
        if let Some(tf_name) = request.tf_name {
            motif.tf_name = tf_name;
        }
        if let Some(pfm) = new_pfm {
            motif.pfm = pfm;
        }
        Ok(motif.clone())
    }

    /// Removes one motif and returns it
    ///
    /// # Errors
    /// * `JasparError::NotFound` - If no motif has the given identifier
    pub fn delete(&self, motif_id: &str) -> Result<Motif> {
        let mut motifs = self.write();
        let index = motifs
            .iter()
            .position(|m| m.motif_id == motif_id)
            .ok_or_else(|| JasparError::NotFound(motif_id.to_string()))?;
        Ok(motifs.remove(index))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Motif>> {
        self.motifs.read().expect("motif store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Motif>> {
        self.motifs.write().expect("motif store lock poisoned")
    }
}
