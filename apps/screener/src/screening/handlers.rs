//! Axum route handlers for the Screening API.

use std::time::Instant;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::screening::pipeline::{PipelineSettings, ScreeningPipeline, ScreeningReport};
use crate::screening::verdict::Verdict;
use crate::state::AppState;

const PDF_MAGIC: &[u8] = b"%PDF-";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw multipart fields, before validation.
#[derive(Debug, Default)]
pub struct ScreeningForm {
    pub resume: Option<Bytes>,
    pub requirements: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub analysis: String,
    pub translation: String,
    pub evaluation: String,
    pub elapsed_seconds: f64,
}

impl ScreeningResponse {
    fn new(run_id: Uuid, started_at: DateTime<Utc>, report: ScreeningReport, elapsed_secs: f64) -> Self {
        Self {
            run_id,
            started_at,
            analysis: report.analysis,
            translation: report.translation,
            evaluation: report.evaluation,
            elapsed_seconds: (elapsed_secs * 100.0).round() / 100.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart fields: `resume` (PDF file) and `requirements` (text).
/// Runs the full screening crew and returns all three outputs.
pub async fn handle_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let form = read_form(multipart).await?;
    let (resume, requirements) = validate_form(form, &state.config)?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let started = Instant::now();

    let staged = state.staging.stage(&resume)?;
    info!(%run_id, bytes = resume.len(), path = %staged.path().display(), "Resume staged");

    let pipeline = ScreeningPipeline::new(
        state.llm.clone(),
        PipelineSettings::from_config(&state.config),
    );
    let result = pipeline.run_document(staged.path(), &requirements).await;

    if let Err(e) = staged.close() {
        warn!(%run_id, "Failed to remove staged resume: {e}");
    }

    let report = result.map_err(|e| {
        warn!(%run_id, "Screening run failed");
        AppError::Screening(e)
    })?;

    let elapsed = started.elapsed().as_secs_f64();
    match Verdict::classify(&report.evaluation, state.config.target_language) {
        Some(verdict) => info!(%run_id, ?verdict, elapsed_secs = elapsed, "Screening completed"),
        None => warn!(
            %run_id,
            elapsed_secs = elapsed,
            "Screening completed but the evaluation does not start with a decision token"
        ),
    }

    Ok(Json(ScreeningResponse::new(run_id, started_at, report, elapsed)))
}

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => form.resume = Some(field.bytes().await.map_err(malformed)?),
            Some("requirements") => form.requirements = Some(field.text().await.map_err(malformed)?),
            _ => {
                // Unknown fields are drained and ignored.
                field.bytes().await.map_err(malformed)?;
            }
        }
    }

    Ok(form)
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Could not read the upload: {}", e.body_text()))
}

/// Checks the form and returns the resume bytes with the trimmed requirements.
pub fn validate_form(form: ScreeningForm, config: &Config) -> Result<(Bytes, String), AppError> {
    let resume = form.resume.filter(|r| !r.is_empty());
    let requirements = form
        .requirements
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let (resume, requirements) = match (resume, requirements) {
        (Some(resume), Some(requirements)) => (resume, requirements),
        (None, None) => {
            return Err(AppError::Validation(
                "Upload a resume and enter the job requirements".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(AppError::Validation("A resume PDF is required".to_string()))
        }
        (Some(_), None) => {
            return Err(AppError::Validation("Job requirements are required".to_string()))
        }
    };

    if requirements.chars().count() > config.max_requirements_chars {
        return Err(AppError::Validation(format!(
            "Job requirements must be at most {} characters",
            config.max_requirements_chars
        )));
    }

    if resume.len() > config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "The resume exceeds the {} byte upload limit",
            config.max_upload_bytes
        )));
    }

    if !resume.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("The resume must be a PDF file".to_string()));
    }

    Ok((resume, requirements))
}
