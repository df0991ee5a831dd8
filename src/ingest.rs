use log::{info, warn};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::embedding::EmbeddingClient;
use crate::errors::ResponderError;
use crate::index::FaqCatalog;
use crate::types::FaqRecord;

// a row of the FAQ source table; either column may be absent
#[derive(Clone, Debug, Deserialize)]
pub struct FaqRow {
    #[serde(rename = "User Query", default)]
    pub query_text: Option<String>,
    #[serde(rename = "Product Responses", default)]
    pub answer_text: Option<String>,
}

impl FaqRow {
    fn into_record(self) -> Option<FaqRecord> {
        let query_text = self.query_text.filter(|q| !q.trim().is_empty())?;
        let answer_text = self.answer_text.filter(|a| !a.trim().is_empty())?;
        Some(FaqRecord {
            query_text,
            answer_text,
        })
    }
}

/// Drops rows missing either the query or the answer, keeping source order.
pub fn clean_rows(rows: Vec<FaqRow>) -> Vec<FaqRecord> {
    let total = rows.len();
    let records: Vec<FaqRecord> = rows.into_iter().filter_map(FaqRow::into_record).collect();
    if records.len() < total {
        warn!(
            "dropped {} FAQ rows with a missing query or answer",
            total - records.len()
        );
    }
    records
}

/// Reads a JSON array of FAQ rows.
pub fn load_faq_rows(path: &Path) -> Result<Vec<FaqRecord>, ResponderError> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<FaqRow> = serde_json::from_reader(reader)?;
    Ok(clean_rows(rows))
}

pub async fn build_catalog(
    records: Vec<FaqRecord>,
    client: &EmbeddingClient,
    batch_size: usize,
) -> Result<FaqCatalog, ResponderError> {
    let texts: Vec<String> = records.iter().map(FaqRecord::embedding_input).collect();
    let embeddings = client.embed_batch(&texts, batch_size).await?;
    FaqCatalog::from_embeddings(records, &embeddings)
}

/// Full offline job: load the source table, embed, and persist both artifacts.
pub async fn run_ingestion(
    source: &Path,
    index_path: &Path,
    metadata_path: &Path,
    client: &EmbeddingClient,
    batch_size: usize,
) -> Result<FaqCatalog, ResponderError> {
    let records = load_faq_rows(source)?;
    info!("loaded {} FAQ rows from {}", records.len(), source.display());

    let catalog = build_catalog(records, client, batch_size).await?;

    for path in [index_path, metadata_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }
    catalog.save(index_path, metadata_path)?;
    info!(
        "wrote {} FAQ entries to {} and {}",
        catalog.len(),
        index_path.display(),
        metadata_path.display()
    );
    Ok(catalog)
}
