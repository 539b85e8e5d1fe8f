use crate::edgelist::{from_snapshot, to_snapshot, EdgeListError};
use crate::index::{EdgeWeight, WeightedGraph};
use cograph_core::error::{CographError, ErrorCode};
use cograph_core::model::{GraphSnapshot, NetworkKind};
use crc32fast::Hasher;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{AlignedVec, Deserialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Header: [CRC: 4 bytes][Len: 8 bytes], then the archived payload.
const HEADER_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum GraphStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error")]
    Serialization,
    #[error("Corrupt snapshot {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("Invalid snapshot contents: {0}")]
    Contents(#[from] EdgeListError),
}

impl CographError for GraphStoreError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::Internal
    }
}

/// One snapshot file per network kind under a data directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, kind: NetworkKind) -> PathBuf {
        self.dir.join(format!("{}_network.rkyv", kind))
    }

    /// Atomically writes to a temp file then renames.
    pub async fn save<W: EdgeWeight>(
        &self,
        kind: NetworkKind,
        graph: &WeightedGraph<W>,
    ) -> Result<PathBuf, GraphStoreError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let payload = encode(&to_snapshot(graph))?;
        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let crc = hasher.finalize();

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&crc.to_be_bytes());
        bytes.extend_from_slice(&(payload.len() as u64).to_be_bytes());
        bytes.extend_from_slice(&payload);

        let path = self.path_for(kind);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!(
            "Saved {} network snapshot: {} nodes, {} edges",
            kind,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(path)
    }

    /// `Ok(None)` when no snapshot has been written for `kind` yet.
    pub async fn load<W: EdgeWeight>(
        &self,
        kind: NetworkKind,
    ) -> Result<Option<WeightedGraph<W>>, GraphStoreError> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).await?;
        let snapshot = decode(&path, &bytes)?;
        Ok(Some(from_snapshot(&snapshot)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn encode(snapshot: &GraphSnapshot) -> Result<AlignedVec, GraphStoreError> {
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(snapshot)
        .map_err(|_| GraphStoreError::Serialization)?;
    Ok(serializer.into_serializer().into_inner())
}

fn decode(path: &Path, bytes: &[u8]) -> Result<GraphSnapshot, GraphStoreError> {
    let corrupt = |reason: &str| GraphStoreError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if bytes.len() < HEADER_LEN {
        return Err(corrupt("truncated header"));
    }
    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[0..4]);
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[4..HEADER_LEN]);
    let expected_crc = u32::from_be_bytes(crc_bytes);
    let len = u64::from_be_bytes(len_bytes) as usize;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() != len {
        return Err(corrupt("length mismatch"));
    }

    let mut hasher = Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != expected_crc {
        return Err(corrupt("CRC mismatch"));
    }

    // Archived data must be aligned before validation.
    let mut aligned = AlignedVec::with_capacity(payload.len());
    aligned.extend_from_slice(payload);

    let archived = rkyv::check_archived_root::<GraphSnapshot>(&aligned[..])
        .map_err(|_| corrupt("archive validation failed"))?;
    archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|_| corrupt("archive deserialization failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CooccurrenceGraph;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_snapshot_save_load() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("Charminar", "Laad Bazaar", 12.0);
        graph.add_edge("Charminar", "Irani Chai", 3.0);
        graph.add_node("Golconda Fort");

        let path = store.save(NetworkKind::Paragraph, &graph).await.unwrap();
        assert!(path.ends_with("paragraph_network.rkyv"));

        let restored: CooccurrenceGraph = store
            .load(NetworkKind::Paragraph)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.node_count(), 4);
        assert_eq!(restored.weight("Laad Bazaar", "Charminar"), Some(12.0));
        assert!(restored.contains("Golconda Fort"));
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested"));
        let loaded: Option<CooccurrenceGraph> = store.load(NetworkKind::Page).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_flipped_byte_detected() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("Haleem", "Nihari", 2.0);
        let path = store.save(NetworkKind::Sentence, &graph).await.unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        let err = store
            .load::<f64>(NetworkKind::Sentence)
            .await
            .unwrap_err();
        assert!(matches!(err, GraphStoreError::Corrupt { .. }));
    }
}
