//! Exact nearest-neighbour search over the FAQ corpus.
//!
//! [`FlatL2Index`] is a brute-force Euclidean index: every query scans every stored
//! vector. [`FaqCatalog`] pairs it with the metadata table so that `records[i]`
//! always describes the vector at position `i`.

use bincode::Options;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::errors::ResponderError;
use crate::types::{Embedding, FaqEntry, FaqRecord};

const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchHit {
    pub position: usize,
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    // row-major, `dimension` floats per entry, insertion order
    data: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    dimension: u64,
    count: u64,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        FlatL2Index {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, embedding: &Embedding) -> Result<usize, ResponderError> {
        if embedding.dimension() != self.dimension || self.dimension == 0 {
            return Err(ResponderError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.dimension(),
            });
        }
        self.data.extend_from_slice(&embedding.vector);
        Ok(self.len() - 1)
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Returns up to `top_k` hits ordered nearest first. Equal distances keep scan order.
    pub fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, ResponderError> {
        if top_k == 0 {
            return Err(ResponderError::InvalidInput(
                "top_k must be positive".to_string(),
            ));
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.dimension() != self.dimension {
            return Err(ResponderError::DimensionMismatch {
                expected: self.dimension,
                actual: query.dimension(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, row)| SearchHit {
                position,
                distance: l2_distance(row, &query.vector),
            })
            .collect();
        // stable sort, ties stay in insertion order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(top_k);
        Ok(hits)
    }

    pub fn save(&self, path: &Path) -> Result<(), ResponderError> {
        let file = IndexFile {
            version: INDEX_FORMAT_VERSION,
            dimension: self.dimension as u64,
            count: self.len() as u64,
            data: self.data.clone(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        index_codec().serialize_into(&mut writer, &file)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ResponderError> {
        let artifact = open_artifact(path)?;
        // a corrupt length prefix must not claim more than the file holds
        let size = artifact.metadata()?.len();
        let file: IndexFile = index_codec()
            .with_limit(size)
            .deserialize_from(BufReader::new(artifact))?;
        if file.version != INDEX_FORMAT_VERSION {
            return Err(ResponderError::Encoding(Box::new(bincode::ErrorKind::Custom(
                format!("unsupported index format version {}", file.version),
            ))));
        }
        let expected_len = file.dimension.checked_mul(file.count);
        if expected_len != Some(file.data.len() as u64) {
            return Err(ResponderError::Encoding(Box::new(bincode::ErrorKind::Custom(
                format!(
                    "index payload holds {} floats, expected {} x {}",
                    file.data.len(),
                    file.count,
                    file.dimension
                ),
            ))));
        }
        Ok(FlatL2Index {
            dimension: file.dimension as usize,
            data: file.data,
        })
    }
}

fn index_codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

fn open_artifact(path: &Path) -> Result<File, ResponderError> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            ResponderError::IndexNotLoaded(format!("{} does not exist", path.display()))
        }
        _ => ResponderError::Io(e),
    })
}

/// The FAQ vector index and its positionally aligned metadata table.
///
/// Loaded once at startup and shared read-only across requests.
#[derive(Clone, Debug, PartialEq)]
pub struct FaqCatalog {
    index: FlatL2Index,
    records: Vec<FaqRecord>,
}

impl FaqCatalog {
    pub fn new(index: FlatL2Index, records: Vec<FaqRecord>) -> Result<Self, ResponderError> {
        if index.len() != records.len() {
            return Err(ResponderError::IndexMisaligned {
                vectors: index.len(),
                records: records.len(),
            });
        }
        Ok(FaqCatalog { index, records })
    }

    /// Builds a catalog from records and their embeddings, in matching order.
    pub fn from_embeddings(
        records: Vec<FaqRecord>,
        embeddings: &[Embedding],
    ) -> Result<Self, ResponderError> {
        if records.len() != embeddings.len() {
            return Err(ResponderError::IndexMisaligned {
                vectors: embeddings.len(),
                records: records.len(),
            });
        }
        let dimension = embeddings.first().map(Embedding::dimension).unwrap_or(0);
        let mut index = FlatL2Index::new(dimension);
        for embedding in embeddings {
            index.add(embedding)?;
        }
        FaqCatalog::new(index, records)
    }

    pub fn empty() -> Self {
        FaqCatalog {
            index: FlatL2Index::new(0),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, ResponderError> {
        self.index.search(query, top_k)
    }

    pub fn entry(&self, position: usize) -> Option<FaqEntry> {
        let record = self.records.get(position)?;
        let vector = self.index.vector(position)?;
        Some(FaqEntry {
            id: position,
            query_text: record.query_text.clone(),
            answer_text: record.answer_text.clone(),
            embedding: Embedding::new(vector.to_vec()),
        })
    }

    /// Resolves the single nearest FAQ entry, or `None` for an empty catalog.
    pub fn nearest(&self, query: &Embedding) -> Result<Option<FaqEntry>, ResponderError> {
        let hits = self.search(query, 1)?;
        Ok(hits.first().and_then(|hit| self.entry(hit.position)))
    }

    pub fn save(&self, index_path: &Path, metadata_path: &Path) -> Result<(), ResponderError> {
        self.index.save(index_path)?;
        let mut writer = BufWriter::new(File::create(metadata_path)?);
        serde_json::to_writer(&mut writer, &self.records)?;
        writer.flush()?;
        Ok(())
    }

    /// Loads both artifacts together. Any failure here is fatal at startup.
    pub fn load(index_path: &Path, metadata_path: &Path) -> Result<Self, ResponderError> {
        let index = FlatL2Index::load(index_path)?;
        let reader = BufReader::new(open_artifact(metadata_path)?);
        let records: Vec<FaqRecord> = serde_json::from_reader(reader)?;
        let catalog = FaqCatalog::new(index, records)?;
        info!(
            "loaded FAQ catalog: {} entries, dimension {}",
            catalog.len(),
            catalog.dimension()
        );
        Ok(catalog)
    }
}
