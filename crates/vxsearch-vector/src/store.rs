//! Vector store implementations and corpus loading.
//!
//! # Stores
//!
//! - `JsonlVectorStore`: one JSON chunk per line, indexed by byte offset
//! - `MemoryVectorStore`: in-memory chunks, for tests and embedders
//!
//! [`load_corpus`] reads every vector of a store once and enforces that they
//! all share one dimension.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use vxsearch_core::{Chunk, Error, Result, VectorStore};

use crate::types::Corpus;

// ============================================================================
// JSONL store
// ============================================================================

/// Only the id is decoded while building the offset index.
#[derive(Deserialize)]
struct ChunkHeader {
    id: String,
}

/// A vector store backed by a JSON Lines file.
///
/// Each non-blank line is an object with `id`, `vector`, and `text` fields:
///
/// ```text
/// {"id": "c1", "vector": [0.12, -0.03, ...], "text": "First passage"}
/// {"id": "c2", "vector": [0.08, 0.21, ...], "text": "Second passage"}
/// ```
///
/// Opening the store scans the file once to build an ordered id → byte
/// offset index. [`get_chunk`](VectorStore::get_chunk) seeks straight to the
/// chunk's line and decodes only that line.
pub struct JsonlVectorStore {
    path: PathBuf,
    reader: Mutex<BufReader<File>>,
    offsets: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl JsonlVectorStore {
    /// Open a store and index its chunks.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, a line is not valid JSON with an
    /// `id` field, or an id appears twice.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut reader = BufReader::new(file);

        let mut offsets = Vec::new();
        let mut positions = HashMap::new();
        let mut offset = 0u64;
        let mut line_no = 0usize;
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| Error::io_with_path(e, path))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            if !line.trim().is_empty() {
                let header: ChunkHeader = serde_json::from_str(&line).map_err(|e| {
                    Error::invalid_data(format!("{}:{line_no}: {e}", path.display()))
                })?;
                if positions.contains_key(&header.id) {
                    return Err(Error::invalid_data(format!(
                        "{}:{line_no}: duplicate chunk id '{}'",
                        path.display(),
                        header.id
                    )));
                }
                positions.insert(header.id.clone(), offsets.len());
                offsets.push((header.id, offset));
            }

            offset += read as u64;
        }

        log::debug!("Indexed {} chunks in {}", offsets.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            reader: Mutex::new(reader),
            offsets,
            positions,
        })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl VectorStore for JsonlVectorStore {
    fn chunk_ids(&self) -> Result<Vec<String>> {
        Ok(self.offsets.iter().map(|(id, _)| id.clone()).collect())
    }

    fn get_chunk(&self, id: &str) -> Result<Chunk> {
        let index = *self
            .positions
            .get(id)
            .ok_or_else(|| Error::not_found(format!("chunk '{id}'")))?;
        let offset = self.offsets[index].1;

        let mut reader = self
            .reader
            .lock()
            .map_err(|e| Error::operation(format!("Mutex poisoned: {e}")))?;
        reader
            .seek(SeekFrom::Start(offset))
            .map_err(|e| Error::io_with_path(e, &self.path))?;

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| Error::io_with_path(e, &self.path))?;

        let chunk: Chunk = serde_json::from_str(&line).map_err(|e| {
            Error::invalid_data(format!("{}: chunk '{id}': {e}", self.path.display()))
        })?;
        Ok(chunk)
    }
}

impl std::fmt::Debug for JsonlVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlVectorStore")
            .field("path", &self.path)
            .field("chunks", &self.offsets.len())
            .finish()
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// A vector store holding its chunks in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    chunks: Vec<Chunk>,
    positions: HashMap<String, usize>,
}

impl MemoryVectorStore {
    /// Create a store from chunks in store order.
    ///
    /// # Errors
    ///
    /// Fails if two chunks share an id.
    pub fn new(chunks: Vec<Chunk>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            if positions.insert(chunk.id.clone(), i).is_some() {
                return Err(Error::invalid_data(format!(
                    "duplicate chunk id '{}'",
                    chunk.id
                )));
            }
        }
        Ok(Self { chunks, positions })
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl VectorStore for MemoryVectorStore {
    fn chunk_ids(&self) -> Result<Vec<String>> {
        Ok(self.chunks.iter().map(|c| c.id.clone()).collect())
    }

    fn get_chunk(&self, id: &str) -> Result<Chunk> {
        self.positions
            .get(id)
            .map(|&i| self.chunks[i].clone())
            .ok_or_else(|| Error::not_found(format!("chunk '{id}'")))
    }
}

// ============================================================================
// Corpus loading
// ============================================================================

/// Load every stored vector into a [`Corpus`].
///
/// The corpus dimension is taken from the first chunk.
///
/// # Errors
///
/// Returns [`Error::CorpusIntegrity`] if the store is empty, the first vector
/// is empty, or any later vector has a different length.
pub fn load_corpus(store: &dyn VectorStore) -> Result<Corpus> {
    let mut ids = store.chunk_ids()?.into_iter();
    let first_id = ids
        .next()
        .ok_or_else(|| Error::corpus("vector store contains no chunks"))?;

    let first = store.get_chunk(&first_id)?;
    let mut corpus = Corpus::new(first.dimension())?;
    corpus.push(first.id, &first.vector)?;

    for id in ids {
        let chunk = store.get_chunk(&id)?;
        corpus.push(chunk.id, &chunk.vector)?;
    }

    log::debug!(
        "Loaded corpus: {} vectors, dimension {}",
        corpus.len(),
        corpus.dimension()
    );
    Ok(corpus)
}

// ============================================================================
// Tests
// ============================================================================
