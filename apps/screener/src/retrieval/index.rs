//! In-memory passage index over one document.
//!
//! Text is split into overlapping word windows, one tantivy document per
//! window, ranked with BM25. Terms are lowercased and ASCII-folded so
//! "analisis" finds "análisis". Building the index (PDF parsing included) is
//! CPU-bound; callers run it on the blocking pool.

use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED};
use tantivy::tokenizer::{AsciiFoldingFilter, LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};
use tantivy::{doc, Index, IndexReader, ReloadPolicy, TantivyDocument};
use tracing::debug;

use crate::retrieval::{DocumentSearch, Passage, RetrievalError};

const CHUNK_WORDS: usize = 120;
const CHUNK_OVERLAP: usize = 30;
const TOKENIZER: &str = "resume_text";
// Smallest per-thread budget tantivy accepts.
const WRITER_HEAP_BYTES: usize = 15_000_000;

pub struct DocumentIndex {
    index: Index,
    reader: IndexReader,
    passage: Field,
    chunk: Field,
    chunk_count: usize,
}

impl DocumentIndex {
    pub fn open_pdf(path: &Path) -> Result<Self, RetrievalError> {
        let bytes = std::fs::read(path)?;
        Self::from_pdf_bytes(&bytes)
    }

    pub fn from_pdf_bytes(bytes: &[u8]) -> Result<Self, RetrievalError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| RetrievalError::Pdf(e.to_string()))?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self, RetrievalError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(RetrievalError::EmptyDocument);
        }

        let mut schema_builder = Schema::builder();
        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let passage = schema_builder.add_text_field("passage", text_options);
        let chunk = schema_builder.add_u64_field("chunk", STORED);

        let index = Index::create_in_ram(schema_builder.build());
        index.tokenizers().register(TOKENIZER, analyzer());

        let mut writer = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        let mut chunk_count = 0;
        for (position, (start, end)) in windows(words.len()).enumerate() {
            writer.add_document(doc!(
                passage => words[start..end].join(" "),
                chunk => position as u64
            ))?;
            chunk_count += 1;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        debug!(words = words.len(), chunks = chunk_count, "Built document index");

        Ok(Self {
            index,
            reader,
            passage,
            chunk,
            chunk_count,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}

impl DocumentSearch for DocumentIndex {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Passage>, RetrievalError> {
        // Query syntax is not exposed to the model; only words are searched.
        let words: String = query
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        if words.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let parser = QueryParser::for_index(&self.index, vec![self.passage]);
        let (parsed, errors) = parser.parse_query_lenient(&words);
        if !errors.is_empty() {
            debug!(?errors, "Ignored parts of search query");
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit))?;

        let mut passages = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            if score <= 0.0 {
                continue;
            }
            let stored: TantivyDocument = searcher.doc(address)?;
            let text = stored
                .get_first(self.passage)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let chunk = stored
                .get_first(self.chunk)
                .and_then(|v| v.as_u64())
                .unwrap_or_default() as usize;
            passages.push(Passage { chunk, text, score });
        }

        passages.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.chunk.cmp(&b.chunk)));
        Ok(passages)
    }
}

fn analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .filter(AsciiFoldingFilter)
        .build()
}

/// `(start, end)` word ranges of overlapping windows covering `total` words.
fn windows(total: usize) -> impl Iterator<Item = (usize, usize)> {
    let step = CHUNK_WORDS - CHUNK_OVERLAP;
    (0..)
        .map(move |i| i * step)
        .take_while(move |start| *start == 0 || start + CHUNK_OVERLAP < total)
        .map(move |start| (start, (start + CHUNK_WORDS).min(total)))
}
