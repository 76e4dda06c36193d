//! Screening pipeline: one resume, one requirement text, three tasks.
//!
//! # Flow
//! 1. Open the resume index (`run_document` only, on the blocking pool).
//! 2. Build fresh agents, tasks and crew bound to that document.
//! 3. Kick off with the requirement text and target language as inputs.
//! 4. Collect the three outputs. Any failure returns no partial results.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::crew::{Crew, CrewError, Inputs, Tool};
use crate::llm_client::LanguageModel;
use crate::retrieval::{DocumentIndex, DocumentSearch, ResumeSearchTool, RetrievalError};
use crate::screening::agents::build_agents;
use crate::screening::language::TargetLanguage;
use crate::screening::tasks::{build_tasks, ANALYSIS_TASK, EVALUATION_TASK, TRANSLATION_TASK};

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Could not open resume: {0}")]
    Document(#[from] RetrievalError),

    #[error(transparent)]
    Crew(#[from] CrewError),

    #[error("Document indexing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The three outputs of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub analysis: String,
    pub translation: String,
    pub evaluation: String,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub language: TargetLanguage,
    pub search_top_k: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.target_language,
            search_top_k: config.search_top_k,
        }
    }
}

pub struct ScreeningPipeline {
    llm: Arc<dyn LanguageModel>,
    settings: PipelineSettings,
}

impl ScreeningPipeline {
    pub fn new(llm: Arc<dyn LanguageModel>, settings: PipelineSettings) -> Self {
        Self { llm, settings }
    }

    /// Opens the PDF at `path` and screens it against `requirements`.
    pub async fn run_document(
        &self,
        path: &Path,
        requirements: &str,
    ) -> Result<ScreeningReport, ScreeningError> {
        let path = path.to_path_buf();
        // PDF parsing is CPU-bound.
        let index = tokio::task::spawn_blocking(move || DocumentIndex::open_pdf(&path)).await??;
        info!(chunks = index.chunk_count(), "Resume indexed");
        self.run(Arc::new(index), requirements).await
    }

    /// Screens an already opened document against `requirements`.
    pub async fn run(
        &self,
        document: Arc<dyn DocumentSearch>,
        requirements: &str,
    ) -> Result<ScreeningReport, ScreeningError> {
        let search: Arc<dyn Tool> =
            Arc::new(ResumeSearchTool::new(document, self.settings.search_top_k));
        let crew = Crew::new(
            build_agents(self.llm.clone(), search.clone()),
            build_tasks(search),
        )?;

        info!(
            language = %self.settings.language,
            requirements_chars = requirements.chars().count(),
            "Starting screening run"
        );

        let output = crew
            .kickoff(&screening_inputs(requirements, self.settings.language))
            .await?;

        Ok(ScreeningReport {
            analysis: output.raw(ANALYSIS_TASK)?.to_string(),
            translation: output.raw(TRANSLATION_TASK)?.to_string(),
            evaluation: output.raw(EVALUATION_TASK)?.to_string(),
        })
    }
}

/// One input map shared by every template of the run.
pub fn screening_inputs(requirements: &str, language: TargetLanguage) -> Inputs {
    Inputs::from([
        ("requirements".to_string(), requirements.to_string()),
        ("language".to_string(), language.name().to_string()),
        ("meets".to_string(), language.meets_token().to_string()),
        (
            "does_not_meet".to_string(),
            language.does_not_meet_token().to_string(),
        ),
    ])
}
