//! The upload → persist → converse workflow facade.
//!
//! `DataChat` is the explicit session object the presentation layer holds:
//! it owns the dataset store, the chart renderer, and the generator handle,
//! and lazily binds one conversational session on the first question. Every
//! interaction reloads the dataset from the store, so the persisted slot is
//! the single source of truth.

use std::sync::Arc;
use tabula_core::chart::{ChartImage, ChartRenderer, ChartRequest};
use tabula_core::config::TabulaConfig;
use tabula_core::dataset::{Dataset, DatasetRepository, DatasetSummary};
use tabula_core::error::{Result, TabulaError};
use tabula_core::generate::{GenerateOptions, TextGenerator};
use tabula_core::session::{ChatSession, ConversationTurn};
use tabula_infrastructure::ingest::{decode_upload, UploadFormat};
use tabula_infrastructure::paths::TabulaPaths;
use tabula_infrastructure::{CsvDatasetStore, PlottersChartRenderer};
use tabula_interaction::OllamaGenerator;
use tokio::sync::Mutex;

/// One interactive data-exploration workflow.
///
/// All operations borrow `&self`; the conversational session behind the
/// mutex serializes asks, matching the single-interactive-caller design.
pub struct DataChat {
    store: Arc<dyn DatasetRepository>,
    renderer: Arc<dyn ChartRenderer>,
    generator: Arc<dyn TextGenerator>,
    options: GenerateOptions,
    session: Mutex<Option<ChatSession>>,
}

impl DataChat {
    /// Creates a facade over explicit collaborators.
    pub fn new(
        store: Arc<dyn DatasetRepository>,
        renderer: Arc<dyn ChartRenderer>,
        generator: Arc<dyn TextGenerator>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            store,
            renderer,
            generator,
            options,
            session: Mutex::new(None),
        }
    }

    /// Wires the default production stack: CSV slot store, plotters
    /// renderer, and an Ollama-protocol generator, all per `config`.
    pub fn from_config(config: &TabulaConfig) -> Result<Self> {
        let dataset_path = match &config.storage.dataset_path {
            Some(path) => path.clone(),
            None => TabulaPaths::dataset_file()?,
        };
        Ok(Self::new(
            Arc::new(CsvDatasetStore::new(dataset_path)),
            Arc::new(PlottersChartRenderer::default()),
            Arc::new(OllamaGenerator::from_config(&config.model)),
            config.model.options.clone(),
        ))
    }

    /// Decodes an upload and persists it as the current dataset, replacing
    /// any previous one. Returns the decoded dataset for immediate display.
    pub async fn upload(&self, bytes: &[u8], format: UploadFormat) -> Result<Dataset> {
        let dataset = decode_upload(bytes, format)?;
        self.store.save(&dataset).await?;
        tracing::info!(
            rows = dataset.row_count(),
            columns = dataset.columns().len(),
            ?format,
            "upload persisted"
        );
        Ok(dataset)
    }

    /// Per-column descriptive statistics for the current dataset.
    pub async fn summary(&self) -> Result<DatasetSummary> {
        let dataset = self.current_dataset().await?;
        Ok(DatasetSummary::describe(&dataset))
    }

    /// Validates and renders a chart over the current dataset.
    pub async fn chart(&self, request: &ChartRequest) -> Result<ChartImage> {
        let dataset = self.current_dataset().await?;
        request.validate(&dataset.schema())?;
        self.renderer.render(&dataset, request).await
    }

    /// Asks a free-text question about the current dataset.
    ///
    /// The session is created lazily on the first question; if binding
    /// fails with a model-load error, no session is kept and the next ask
    /// retries the bind.
    ///
    /// # Errors
    ///
    /// [`TabulaError::NoDataset`] before any upload,
    /// [`TabulaError::ModelLoad`] if the model cannot be bound, and
    /// [`TabulaError::Inference`] when generation fails (the transcript is
    /// then unchanged).
    pub async fn ask(&self, question: &str) -> Result<String> {
        let dataset = self.current_dataset().await?;
        let schema = dataset.schema();

        let mut guard = self.session.lock().await;
        if guard.is_none() {
            *guard = Some(ChatSession::bind(self.generator.clone(), self.options.clone()).await?);
        }
        match guard.as_mut() {
            Some(session) => session.ask(question, &schema).await,
            None => Err(TabulaError::internal("session missing after bind")),
        }
    }

    /// Clears the conversation transcript. The model binding is retained;
    /// a no-op when no question has been asked yet.
    pub async fn reset(&self) {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_mut() {
            session.reset();
        }
    }

    /// The transcript so far, empty before the first ask.
    pub async fn transcript(&self) -> Vec<ConversationTurn> {
        let guard = self.session.lock().await;
        guard
            .as_ref()
            .map(|s| s.transcript().to_vec())
            .unwrap_or_default()
    }

    async fn current_dataset(&self) -> Result<Dataset> {
        self.store.load().await?.ok_or(TabulaError::NoDataset)
    }
}
