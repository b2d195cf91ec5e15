use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Field, Shape, StructuredResult};

/// A multi-week study plan. Optional per-week arrays the model leaves out
/// are returned as empty arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub weekly_schedule: Vec<StudyWeek>,
    pub estimated_completion_time: String,
    pub prerequisites: Vec<Value>,
    pub additional_resources: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyWeek {
    pub week: u32,
    pub topics: Vec<String>,
    // Free-form: the model returns either strings or {type, links, description}
    #[serde(default)]
    pub resources: Vec<Value>,
    #[serde(default)]
    pub objectives: Vec<Value>,
    #[serde(default)]
    pub assessments: Vec<Value>,
    #[serde(default)]
    pub activities: Vec<Value>,
}

static WEEK_SHAPE: Shape = Shape::Object(&[
    Field {
        name: "week",
        shape: Shape::WholeNumber,
        required: true,
    },
    Field {
        name: "topics",
        shape: Shape::Array(&Shape::String),
        required: true,
    },
    Field {
        name: "resources",
        shape: Shape::Array(&Shape::Any),
        required: false,
    },
    Field {
        name: "objectives",
        shape: Shape::Array(&Shape::Any),
        required: false,
    },
    Field {
        name: "assessments",
        shape: Shape::Array(&Shape::Any),
        required: false,
    },
    Field {
        name: "activities",
        shape: Shape::Array(&Shape::Any),
        required: false,
    },
]);

static STUDY_PLAN_SHAPE: Shape = Shape::Object(&[
    Field {
        name: "weeklySchedule",
        shape: Shape::NonEmptyArray(&WEEK_SHAPE),
        required: true,
    },
    Field {
        name: "estimatedCompletionTime",
        shape: Shape::String,
        required: true,
    },
    Field {
        name: "prerequisites",
        shape: Shape::Array(&Shape::Any),
        required: true,
    },
    Field {
        name: "additionalResources",
        shape: Shape::Array(&Shape::Any),
        required: true,
    },
]);

impl StructuredResult for StudyPlan {
    const KIND: &'static str = "study plan";

    fn shape() -> &'static Shape {
        &STUDY_PLAN_SHAPE
    }
}
