//! Text Extractor: turns uploaded resume PDF bytes into plain text.
//!
//! Strategies are tried in the order given by the `ExtractionPolicy`; the first
//! one producing non-empty trimmed text wins. Every backend failure is caught
//! and logged here. Callers only ever see an `ExtractedText`, with `ok = false`
//! when nothing worked.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod handlers;
pub mod policy;
pub mod prompts;
pub mod text_layer;
pub mod vision;

pub use policy::{ExtractionPolicy, ExtractionStrategy};
pub use vision::{PdftoppmRasterizer, VisionOcr};

/// Failure inside a single strategy. Never leaves this module.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("{0}")]
    Backend(String),

    #[error("{0} panicked on this document")]
    Panicked(&'static str),

    #[error("rasterizer error: {0}")]
    Raster(String),

    #[error("strategy '{0}' is not configured")]
    Unavailable(ExtractionStrategy),
}

/// Result of running the fallback chain over one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub ok: bool,
    /// The strategy that produced `text`, if any did.
    pub strategy: Option<ExtractionStrategy>,
    /// Number of non-empty page fragments joined into `text`.
    pub pages: usize,
}

impl ExtractedText {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            ok: false,
            strategy: None,
            pages: 0,
        }
    }

    /// The first `max_chars` characters, for display.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Joins page fragments with `\n`, dropping blank pages, and trims the result.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The configured fallback chain.
#[derive(Clone)]
pub struct TextExtractor {
    policy: ExtractionPolicy,
    vision: Option<VisionOcr>,
}

impl TextExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self {
            policy,
            vision: None,
        }
    }

    pub fn with_vision(mut self, vision: VisionOcr) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    pub async fn extract(&self, pdf: Bytes) -> ExtractedText {
        if pdf.is_empty() {
            info!("extract: empty upload, nothing to read");
            return ExtractedText::empty();
        }

        for &strategy in self.policy.strategies() {
            let pages = match self.run(strategy, &pdf).await {
                Ok(pages) => pages,
                Err(e) => {
                    warn!("extract: {strategy} failed: {e}");
                    continue;
                }
            };

            let text = join_pages(&pages);
            if text.is_empty() {
                debug!("extract: {strategy} yielded no text");
                continue;
            }

            let page_count = pages.iter().filter(|p| !p.trim().is_empty()).count();
            info!(
                "extract: {strategy} produced {} chars from {page_count} page(s)",
                text.len()
            );
            return ExtractedText {
                text,
                ok: true,
                strategy: Some(strategy),
                pages: page_count,
            };
        }

        info!("extract: no strategy produced text ({})", self.policy);
        ExtractedText::empty()
    }

    async fn run(
        &self,
        strategy: ExtractionStrategy,
        pdf: &Bytes,
    ) -> Result<Vec<String>, ExtractionError> {
        match strategy {
            ExtractionStrategy::TextLayer => blocking(pdf, text_layer::lopdf_pages).await,
            ExtractionStrategy::FallbackTextLayer => {
                blocking(pdf, text_layer::pdf_extract_pages).await
            }
            ExtractionStrategy::Vision => match &self.vision {
                Some(vision) => vision.transcribe(pdf).await,
                None => Err(ExtractionError::Unavailable(strategy)),
            },
        }
    }
}

async fn blocking(
    pdf: &Bytes,
    backend: fn(&[u8]) -> Result<Vec<String>, ExtractionError>,
) -> Result<Vec<String>, ExtractionError> {
    let pdf = pdf.clone();
    tokio::task::spawn_blocking(move || backend(&pdf))
        .await
        .map_err(|e| ExtractionError::Backend(format!("extraction task failed: {e}")))?
}

#[cfg(test)]
pub mod fixtures {
    //! In-memory PDFs built with lopdf.

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// One page per entry; an empty string yields a page with no text operators.
    pub fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in texts {
            let operations = if text.is_empty() {
                vec![]
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save pdf");
        buf
    }
}
