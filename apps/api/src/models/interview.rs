use serde::{Deserialize, Serialize};

use crate::validation::{Field, Shape, StructuredResult};

/// Interview questions grouped by category (technical, behavioral, situational).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestions {
    pub questions: Vec<QuestionCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCategory {
    #[serde(rename = "type")]
    pub category: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

static QUESTION_SHAPE: Shape = Shape::Object(&[
    Field {
        name: "question",
        shape: Shape::NonEmptyString,
        required: true,
    },
    Field {
        name: "hint",
        shape: Shape::String,
        required: false,
    },
]);

static CATEGORY_SHAPE: Shape = Shape::Object(&[
    Field {
        name: "type",
        shape: Shape::NonEmptyString,
        required: true,
    },
    Field {
        name: "questions",
        shape: Shape::Array(&QUESTION_SHAPE),
        required: true,
    },
]);

static INTERVIEW_QUESTIONS_SHAPE: Shape = Shape::Object(&[Field {
    name: "questions",
    shape: Shape::Array(&CATEGORY_SHAPE),
    required: true,
}]);

impl StructuredResult for InterviewQuestions {
    const KIND: &'static str = "interview questions";

    fn shape() -> &'static Shape {
        &INTERVIEW_QUESTIONS_SHAPE
    }
}
