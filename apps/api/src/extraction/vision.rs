//! Rasterize-and-recognize: render pages to PNG and have the model transcribe them.
//!
//! Rendering goes through the `PageRasterizer` trait. The default backend pipes
//! the PDF into poppler's `pdftoppm` over stdin and reads the PNG from stdout,
//! so nothing touches the filesystem.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::extraction::prompts::page_transcription_prompt;
use crate::extraction::{text_layer, ExtractionError};
use crate::llm_client::{GenerativeModel, ImagePart};

/// Renders a single PDF page to PNG bytes.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn render_page(&self, pdf: Bytes, page_number: u32) -> Result<Vec<u8>, ExtractionError>;
}

/// `pdftoppm` from poppler-utils.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            binary: "pdftoppm".to_string(),
            dpi,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn render_page(&self, pdf: Bytes, page_number: u32) -> Result<Vec<u8>, ExtractionError> {
        let page = page_number.to_string();
        let mut child = Command::new(&self.binary)
            .args(["-png", "-singlefile", "-r"])
            .arg(self.dpi.to_string())
            .args(["-f", page.as_str(), "-l", page.as_str(), "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExtractionError::Raster(format!("failed to run {}: {e}", self.binary)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExtractionError::Raster("rasterizer stdin unavailable".to_string()))?;

        // Feed stdin concurrently so a full stdout pipe cannot stall the child.
        let feeder = tokio::spawn(async move {
            let result = stdin.write_all(&pdf).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExtractionError::Raster(e.to_string()))?;

        match feeder.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("rasterizer closed stdin early: {e}"),
            Err(e) => debug!("rasterizer stdin task failed: {e}"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Raster(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(ExtractionError::Raster(format!(
                "{} produced no image for page {page_number}",
                self.binary
            )));
        }
        Ok(output.stdout)
    }
}

/// The vision strategy: one model call per rendered page.
#[derive(Clone)]
pub struct VisionOcr {
    model: Arc<dyn GenerativeModel>,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl VisionOcr {
    pub fn new(model: Arc<dyn GenerativeModel>, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self { model, rasterizer }
    }

    /// Returns one transcription per page that rendered and got an answer.
    pub async fn transcribe(&self, pdf: &Bytes) -> Result<Vec<String>, ExtractionError> {
        let counted = pdf.clone();
        let page_numbers = tokio::task::spawn_blocking(move || text_layer::page_numbers(&counted))
            .await
            .map_err(|e| ExtractionError::Backend(format!("page count task failed: {e}")))??;

        let prompt = page_transcription_prompt();
        let mut pages = Vec::with_capacity(page_numbers.len());

        for page_number in page_numbers {
            let image = match self.rasterizer.render_page(pdf.clone(), page_number).await {
                Ok(image) => image,
                Err(e) => {
                    warn!("vision: skipping page {page_number}: {e}");
                    continue;
                }
            };

            match self
                .model
                .generate_with_image(&prompt, &ImagePart::png(image))
                .await
            {
                Ok(text) => pages.push(text),
                Err(e) => warn!("vision: model failed on page {page_number}: {e}"),
            }
        }

        Ok(pages)
    }
}
