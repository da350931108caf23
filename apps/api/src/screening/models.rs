use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coarse judgment of how well the candidate matches the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitLevel {
    Strong,
    Medium,
    Low,
}

impl FitLevel {
    pub const ALLOWED: &'static [&'static str] = &["Strong", "Medium", "Low"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const ALLOWED: &'static [&'static str] = &["High", "Medium", "Low"];
}

/// The next step a recruiter should take with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningRecommendation {
    #[serde(rename = "Proceed to technical interview")]
    ProceedToTechnicalInterview,
    #[serde(rename = "Recruiter screen only")]
    RecruiterScreenOnly,
    Reject,
}

impl ScreeningRecommendation {
    pub const ALLOWED: &'static [&'static str] = &[
        "Proceed to technical interview",
        "Recruiter screen only",
        "Reject",
    ];
}

/// Reads a string-valued enum field. Only bare strings qualify; serde would
/// otherwise also accept the `{"Variant": null}` map form.
pub(super) fn enum_field<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_string() {
        return None;
    }
    T::deserialize(value).ok()
}

/// The uploaded resume as received: declared content type plus raw bytes.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One screening request. Lives for the duration of the call only.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub position_title: String,
    pub position_description: String,
    pub resume: ResumeUpload,
}

/// A model-produced analysis object that passed schema validation.
///
/// Only `validation::validate` constructs this type. It serializes to exactly
/// the object the model returned, unknown keys included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedAnalysis(Map<String, Value>);

impl ValidatedAnalysis {
    pub(super) fn new_unchecked(object: Map<String, Value>) -> Self {
        Self(object)
    }

    fn enum_of<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(enum_field)
    }

    pub fn fit_level(&self) -> Option<FitLevel> {
        self.enum_of("fit_level")
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.enum_of("confidence")
    }

    pub fn suitable(&self) -> bool {
        self.0.get("suitable").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn screening_recommendation(&self) -> Option<ScreeningRecommendation> {
        self.enum_of("screening_recommendation")
    }
}
