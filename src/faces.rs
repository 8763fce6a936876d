//! Known-identity registry.
//!
//! The known face set is an external collaborator boundary: a directory of
//! `<name>.json` files, each holding one reference embedding. It is loaded
//! once at startup and immutable for the process lifetime. Unreadable or
//! corrupt entries are skipped with a warning, never fatal for the set.

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::OnceLock;

/// Default match tolerance: embeddings within this euclidean distance count
/// as the same person. Mirrors the comparator the legacy recognizer shipped
/// with.
pub const DEFAULT_MATCH_TOLERANCE: f32 = 0.6;

/// Reference or candidate face embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceEmbedding(pub Vec<f32>);

impl FaceEmbedding {
    /// Euclidean distance between two embeddings. Dimension mismatch is a
    /// non-match, not an error: detector and registry may disagree on model
    /// versions and the frame must keep flowing.
    pub fn distance(&self, other: &FaceEmbedding) -> Option<f32> {
        if self.0.len() != other.0.len() {
            return None;
        }
        let sum: f32 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        Some(sum.sqrt())
    }

    pub fn matches(&self, candidate: &FaceEmbedding, tolerance: f32) -> bool {
        match self.distance(candidate) {
            Some(d) => d <= tolerance,
            None => false,
        }
    }
}

/// A conforming identity name is a short printable token, no path separators
/// or control characters. Positive allowlist to avoid trivial bypasses.
pub fn validate_identity_name(name: &str) -> Result<()> {
    // Compile once for hot paths.
    static NAME_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re =
        NAME_RE.get_or_init(|| regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _.-]{0,63}$").unwrap());
    if !re.is_match(name) {
        return Err(anyhow!(
            "identity name must match ^[A-Za-z0-9][A-Za-z0-9 _.-]{{0,63}}$"
        ));
    }
    Ok(())
}

#[derive(Clone, Debug)]
struct KnownFace {
    name: String,
    embedding: FaceEmbedding,
}

/// Registry of enrolled identities and their reference embeddings.
///
/// Resolution is **first registered match**: entries are scanned in
/// registration order and the first one whose embedding matches wins. This is
/// a kept legacy policy (not best-match-by-distance); under near-duplicate
/// embeddings it changes which name is reported, so it stays explicit and
/// deterministic.
#[derive(Clone, Debug)]
pub struct KnownFaceSet {
    entries: Vec<KnownFace>,
    tolerance: f32,
}

impl KnownFaceSet {
    pub fn new(tolerance: f32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    /// Register an identity. Registration order is the tie-break order for
    /// resolution.
    pub fn register(&mut self, name: &str, embedding: FaceEmbedding) -> Result<()> {
        validate_identity_name(name)?;
        self.entries.push(KnownFace {
            name: name.to_string(),
            embedding,
        });
        Ok(())
    }

    /// Load `<name>.json` embedding files from a directory.
    ///
    /// Entries are sorted by file name before registration so that
    /// first-match resolution is deterministic across platforms (the legacy
    /// system inherited whatever order the OS listed files in).
    pub fn load_dir(dir: &Path, tolerance: f32) -> Result<Self> {
        let mut set = Self::new(tolerance);
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| anyhow!("failed to read known faces dir {}: {}", dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("skipping known face with non-UTF-8 name: {}", path.display());
                continue;
            };
            let embedding = match read_embedding_file(&path) {
                Ok(embedding) => embedding,
                Err(e) => {
                    log::warn!("skipping known face {}: {}", path.display(), e);
                    continue;
                }
            };
            if let Err(e) = set.register(stem, embedding) {
                log::warn!("skipping known face {}: {}", path.display(), e);
            }
        }

        log::info!(
            "loaded {} known identities from {}",
            set.entries.len(),
            dir.display()
        );
        Ok(set)
    }

    /// Resolve a candidate embedding to an identity name. `None` = Unknown.
    pub fn resolve(&self, candidate: &FaceEmbedding) -> Option<&str> {
        self.entries
            .iter()
            .find(|known| known.embedding.matches(candidate, self.tolerance))
            .map(|known| known.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_embedding_file(path: &Path) -> Result<FaceEmbedding> {
    let raw = std::fs::read_to_string(path)?;
    let values: Vec<f32> = serde_json::from_str(&raw)?;
    if values.is_empty() {
        return Err(anyhow!("embedding file is empty"));
    }
    Ok(FaceEmbedding(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> FaceEmbedding {
        FaceEmbedding(values.to_vec())
    }

    #[test]
    fn first_registered_match_wins() {
        let mut set = KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE);
        // Both entries are within tolerance of the candidate; the earlier
        // registration must win regardless of which is geometrically closer.
        set.register("ALICE", emb(&[0.5, 0.0])).unwrap();
        set.register("BOB", emb(&[0.1, 0.0])).unwrap();
        assert_eq!(set.resolve(&emb(&[0.0, 0.0])), Some("ALICE"));
    }

    #[test]
    fn unknown_when_nothing_matches() {
        let mut set = KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE);
        set.register("ALICE", emb(&[10.0, 10.0])).unwrap();
        assert_eq!(set.resolve(&emb(&[0.0, 0.0])), None);
    }

    #[test]
    fn dimension_mismatch_is_a_non_match() {
        let mut set = KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE);
        set.register("ALICE", emb(&[0.0, 0.0, 0.0])).unwrap();
        assert_eq!(set.resolve(&emb(&[0.0, 0.0])), None);
    }

    #[test]
    fn rejects_path_like_identity_names() {
        assert!(validate_identity_name("ALICE").is_ok());
        assert!(validate_identity_name("J. Smith-2").is_ok());
        assert!(validate_identity_name("../etc/passwd").is_err());
        assert!(validate_identity_name("").is_err());
    }

    #[test]
    fn load_dir_skips_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ALICE.json"), "[0.1, 0.2, 0.3]").unwrap();
        std::fs::write(dir.path().join("BROKEN.json"), "not json").unwrap();
        std::fs::write(dir.path().join("EMPTY.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let set = KnownFaceSet::load_dir(dir.path(), DEFAULT_MATCH_TOLERANCE).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.resolve(&emb(&[0.1, 0.2, 0.3])), Some("ALICE"));
    }

    #[test]
    fn load_dir_orders_entries_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ZED.json"), "[0.0]").unwrap();
        std::fs::write(dir.path().join("AMY.json"), "[0.0]").unwrap();

        let set = KnownFaceSet::load_dir(dir.path(), DEFAULT_MATCH_TOLERANCE).unwrap();
        assert_eq!(set.resolve(&emb(&[0.0])), Some("AMY"));
    }
}
