//! Generation requests: wire forms, their validated records, and prompt building.
//!
//! Each endpoint deserializes a lenient `*Form` (every field optional so a
//! missing field becomes a 400 instead of an extractor rejection), validates it
//! into an immutable `*Request`, and renders the prompt from that record.

use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::prompts::{
    render, COVER_LETTER_TEMPLATE, INTERVIEW_QUESTIONS_TEMPLATE, STUDY_PLAN_TEMPLATE,
};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const DEFAULT_CATEGORY: &str = "technical";
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const ALLOWED_RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionsForm {
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewQuestionsRequest {
    pub job_description: String,
    pub category: String,
}

impl InterviewQuestionsForm {
    pub fn validate(self) -> Result<InterviewQuestionsRequest, AppError> {
        let job_description = non_blank(self.job_description)
            .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;
        let category =
            non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(InterviewQuestionsRequest {
            job_description,
            category,
        })
    }
}

impl InterviewQuestionsRequest {
    pub fn prompt(&self) -> String {
        render(
            INTERVIEW_QUESTIONS_TEMPLATE,
            &[
                ("job_description", self.job_description.as_str()),
                ("category", self.category.as_str()),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Study plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanForm {
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub available_time: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPlanRequest {
    pub goals: String,
    pub job_description: String,
    pub available_time: String,
    pub topics: String,
    pub learning_style: String,
    pub current_level: String,
}

impl StudyPlanForm {
    pub fn validate(self) -> Result<StudyPlanRequest, AppError> {
        let (Some(goals), Some(job_description)) =
            (non_blank(self.goals), non_blank(self.job_description))
        else {
            return Err(AppError::Validation(
                "Goals and job description are required".to_string(),
            ));
        };

        Ok(StudyPlanRequest {
            goals,
            job_description,
            available_time: self.available_time.unwrap_or_default(),
            topics: self.topics.unwrap_or_default(),
            learning_style: self.learning_style.unwrap_or_default(),
            current_level: self.current_level.unwrap_or_default(),
        })
    }
}

impl StudyPlanRequest {
    pub fn prompt(&self) -> String {
        render(
            STUDY_PLAN_TEMPLATE,
            &[
                ("goals", self.goals.as_str()),
                ("job_description", self.job_description.as_str()),
                ("available_time", self.available_time.as_str()),
                ("topics", self.topics.as_str()),
                ("learning_style", self.learning_style.as_str()),
                ("current_level", self.current_level.as_str()),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

/// Metadata of an uploaded resume. Contents are measured, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

impl UploadedDocument {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.size == 0 {
            return Err(AppError::Validation("Resume file is empty".to_string()));
        }
        if self.size > MAX_RESUME_BYTES {
            return Err(AppError::Validation(
                "Resume file must be 10MB or smaller".to_string(),
            ));
        }
        if !self.has_allowed_type() {
            return Err(AppError::Validation(
                "Resume must be a PDF, DOC, or DOCX file".to_string(),
            ));
        }
        Ok(())
    }

    fn has_allowed_type(&self) -> bool {
        let by_mime = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .is_some_and(|ct| ALLOWED_RESUME_TYPES.contains(&ct.as_str()));

        let by_extension = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| ALLOWED_RESUME_EXTENSIONS.contains(&ext.as_str()));

        by_mime || by_extension
    }
}

#[derive(Debug, Default)]
pub struct CoverLetterForm {
    pub job_description: Option<String>,
    pub resume: Option<UploadedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverLetterRequest {
    pub job_description: String,
    pub resume: UploadedDocument,
}

impl CoverLetterForm {
    pub fn validate(self) -> Result<CoverLetterRequest, AppError> {
        let (Some(job_description), Some(resume)) =
            (non_blank(self.job_description), self.resume)
        else {
            return Err(AppError::Validation(
                "Resume and job description are required".to_string(),
            ));
        };
        resume.validate()?;

        Ok(CoverLetterRequest {
            job_description,
            resume,
        })
    }
}

impl CoverLetterRequest {
    pub fn prompt(&self) -> String {
        render(
            COVER_LETTER_TEMPLATE,
            &[("job_description", self.job_description.as_str())],
        )
    }
}
