//! Axum route handlers for the Generation API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{ApiError, AppError};
use crate::generation::requests::{
    CoverLetterForm, InterviewQuestionsForm, StudyPlanForm, UploadedDocument, MAX_RESUME_BYTES,
};
use crate::models::interview::InterviewQuestions;
use crate::models::study_plan::StudyPlan;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub success: bool,
    pub cover_letter: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interview-questions
///
/// Generates categorized interview questions for a job description.
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    payload: Result<Json<InterviewQuestionsForm>, JsonRejection>,
) -> Result<Json<InterviewQuestions>, ApiError> {
    interview_questions(&state, payload)
        .await
        .map(Json)
        .map_err(|e| e.with_details(state.development))
}

/// POST /api/study-plan
///
/// Generates a multi-week study plan. `goals` and `jobDescription` are required.
pub async fn handle_study_plan(
    State(state): State<AppState>,
    payload: Result<Json<StudyPlanForm>, JsonRejection>,
) -> Result<Json<StudyPlan>, ApiError> {
    study_plan(&state, payload)
        .await
        .map(Json)
        .map_err(|e| e.with_details(state.development))
}

/// POST /api/generate-cover-letter
///
/// Multipart form with a `resume` file and a `jobDescription` text field.
/// The resume is size/type checked only; its contents never reach the prompt.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CoverLetterResponse>, ApiError> {
    cover_letter(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| e.with_details(state.development))
}

async fn interview_questions(
    state: &AppState,
    payload: Result<Json<InterviewQuestionsForm>, JsonRejection>,
) -> Result<InterviewQuestions, AppError> {
    let Json(form) = payload.map_err(invalid_json)?;
    let request = form.validate()?;

    info!("Generating interview questions (category: {})", request.category);
    state.pipeline.generate(&request.prompt()).await
}

async fn study_plan(
    state: &AppState,
    payload: Result<Json<StudyPlanForm>, JsonRejection>,
) -> Result<StudyPlan, AppError> {
    let Json(form) = payload.map_err(invalid_json)?;
    let request = form.validate()?;

    info!("Generating study plan");
    state.pipeline.generate(&request.prompt()).await
}

async fn cover_letter(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<CoverLetterResponse, AppError> {
    let multipart = multipart.map_err(|e| {
        debug!("Rejected cover letter body: {e}");
        invalid_request_format()
    })?;
    let request = read_cover_letter_form(multipart).await?.validate()?;

    info!(
        "Generating cover letter (resume: {:?}, {} bytes)",
        request.resume.file_name, request.resume.size
    );
    let cover_letter = state.pipeline.generate_text(&request.prompt()).await?;

    Ok(CoverLetterResponse {
        success: true,
        cover_letter,
    })
}

/// Collects the cover-letter form fields. The resume is streamed only to
/// measure its size; unknown fields are skipped.
async fn read_cover_letter_form(mut multipart: Multipart) -> Result<CoverLetterForm, AppError> {
    let mut form = CoverLetterForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                let content_type = field.content_type().map(str::to_string);

                let mut size = 0;
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    size += chunk.len();
                    if size > MAX_RESUME_BYTES {
                        break;
                    }
                }

                // Browsers send an empty, unnamed part when no file was chosen
                if file_name.is_some() || size > 0 {
                    form.resume = Some(UploadedDocument {
                        file_name,
                        content_type,
                        size,
                    });
                }
            }
            Some("jobDescription") => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn invalid_request_format() -> AppError {
    AppError::Validation("Invalid request format".to_string())
}

fn invalid_json(rejection: JsonRejection) -> AppError {
    debug!("Rejected JSON body: {rejection}");
    invalid_request_format()
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation("Resume file must be 10MB or smaller".to_string())
    } else {
        debug!("Malformed multipart body: {e}");
        invalid_request_format()
    }
}
