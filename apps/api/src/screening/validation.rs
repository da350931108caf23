//! Result parsing and schema validation for model output.
//!
//! Parsing is permissive (`None` on anything that is not a JSON object) because
//! malformed output is common enough to warrant the repair round. Validation is
//! strict: exact types, exact enum strings, first violation wins, no coercion.

use std::fmt;

use serde_json::{Map, Value};

use serde::de::DeserializeOwned;

use crate::screening::models::{
    enum_field, Confidence, FitLevel, ScreeningRecommendation, ValidatedAnalysis,
};

/// Every key an analysis object must carry, in check order.
pub const REQUIRED_KEYS: [&str; 14] = [
    "fit_level",
    "suitable",
    "confidence",
    "summary",
    "matched_required_skills",
    "missing_required_skills",
    "matched_nice_to_have",
    "missing_nice_to_have",
    "risk_flags",
    "evidence",
    "screening_recommendation",
    "interview_focus_areas",
    "final_verdict",
    "final_why",
];

const STRING_LIST_KEYS: [&str; 7] = [
    "matched_required_skills",
    "missing_required_skills",
    "matched_nice_to_have",
    "missing_nice_to_have",
    "risk_flags",
    "interview_focus_areas",
    "final_why",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    NotOneOf(&'static [&'static str]),
    NotBoolean,
    NotString,
    NotStringList,
    NotList,
    EvidenceItemMalformed { index: usize },
    EvidenceFieldNotString { index: usize },
}

/// The first schema constraint an analysis object failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.kind {
            ViolationKind::Missing => write!(f, "Missing key: {field}"),
            ViolationKind::NotOneOf(allowed) => {
                write!(f, "{field} invalid (expected one of: {})", allowed.join(", "))
            }
            ViolationKind::NotBoolean => write!(f, "{field} must be boolean"),
            ViolationKind::NotString => write!(f, "{field} must be string"),
            ViolationKind::NotStringList => write!(f, "{field} must be list[str]"),
            ViolationKind::NotList => write!(f, "{field} must be list"),
            ViolationKind::EvidenceItemMalformed { index } => write!(
                f,
                "{field} items must be objects with claim/snippet (item {index})"
            ),
            ViolationKind::EvidenceFieldNotString { index } => {
                write!(f, "{field} claim/snippet must be strings (item {index})")
            }
        }
    }
}

impl std::error::Error for Violation {}

/// Strictly decodes model output. Returns `None` unless the text is a JSON object.
pub fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Checks `object` against the analysis schema and wraps it on success.
pub fn validate(object: Map<String, Value>) -> Result<ValidatedAnalysis, Violation> {
    check(&object)?;
    Ok(ValidatedAnalysis::new_unchecked(object))
}

/// Read-only schema check. Reports the first violation in a fixed order:
/// presence, enums, booleans, strings, string lists, evidence.
pub fn check(object: &Map<String, Value>) -> Result<(), Violation> {
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(violation(key, ViolationKind::Missing));
        }
    }

    check_enum::<FitLevel>(object, "fit_level", FitLevel::ALLOWED)?;
    check_enum::<Confidence>(object, "confidence", Confidence::ALLOWED)?;
    check_enum::<ScreeningRecommendation>(
        object,
        "screening_recommendation",
        ScreeningRecommendation::ALLOWED,
    )?;

    if !object["suitable"].is_boolean() {
        return Err(violation("suitable", ViolationKind::NotBoolean));
    }

    for key in ["summary", "final_verdict"] {
        if !object[key].is_string() {
            return Err(violation(key, ViolationKind::NotString));
        }
    }

    for key in STRING_LIST_KEYS {
        if !is_string_list(&object[key]) {
            return Err(violation(key, ViolationKind::NotStringList));
        }
    }

    check_evidence(&object["evidence"])
}

fn check_enum<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &'static str,
    allowed: &'static [&'static str],
) -> Result<(), Violation> {
    match enum_field::<T>(&object[key]) {
        Some(_) => Ok(()),
        None => Err(violation(key, ViolationKind::NotOneOf(allowed))),
    }
}

fn check_evidence(value: &Value) -> Result<(), Violation> {
    let items = value
        .as_array()
        .ok_or_else(|| violation("evidence", ViolationKind::NotList))?;

    for (index, item) in items.iter().enumerate() {
        let entry = item
            .as_object()
            .filter(|e| e.contains_key("claim") && e.contains_key("snippet"))
            .ok_or_else(|| violation("evidence", ViolationKind::EvidenceItemMalformed { index }))?;

        if !entry["claim"].is_string() || !entry["snippet"].is_string() {
            return Err(violation(
                "evidence",
                ViolationKind::EvidenceFieldNotString { index },
            ));
        }
    }

    Ok(())
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn violation(field: &'static str, kind: ViolationKind) -> Violation {
    Violation { field, kind }
}

#[cfg(test)]
pub(crate) fn sample_analysis() -> Map<String, Value> {
    let value = serde_json::json!({
        "fit_level": "Strong",
        "suitable": true,
        "confidence": "High",
        "summary": "Seasoned backend engineer with five years of Rust. Description was empty, so requirements were inferred from the title.",
        "matched_required_skills": ["Rust", "PostgreSQL", "Distributed systems", "Tokio"],
        "missing_required_skills": ["Kubernetes", "gRPC"],
        "matched_nice_to_have": ["Kafka"],
        "missing_nice_to_have": [],
        "risk_flags": [],
        "evidence": [
            {"claim": "Production Rust experience", "snippet": "Built a Rust ingestion service handling 40k events per second"},
            {"claim": "Database depth", "snippet": "Tuned PostgreSQL queries, cutting p99 latency by 60%"}
        ],
        "screening_recommendation": "Proceed to technical interview",
        "interview_focus_areas": ["Async Rust", "Schema design", "On-call experience"],
        "final_verdict": "The candidate is a strong fit and should proceed to a technical interview.",
        "final_why": ["Deep Rust background", "Relevant data-intensive work"]
    });
    match value {
        Value::Object(object) => object,
        _ => unreachable!(),
    }
}
