//! The input record: who is reading and what they need to get done.
//!
//! Persona and job are kept as the JSON values found in the input, so the
//! report echoes them back unchanged (key order, `null`s and non-string
//! values included). Query text is derived from them on demand.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Query text of one field.
///
/// Strings are used as is, other values as their JSON text; a missing field
/// or `null` is empty.
fn field_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn object<const N: usize>(fields: [(&str, String); N]) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v)))
        .collect();
    Value::Object(map)
}

/// The consuming reader, e.g. `{"role": "Travel Planner", "expertise": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Persona(Value);

impl Default for Persona {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Persona {
    /// Create a persona from role and expertise.
    pub fn new(role: impl Into<String>, expertise: impl Into<String>) -> Self {
        Self(object([("role", role.into()), ("expertise", expertise.into())]))
    }

    /// Wrap a persona value as found in the input.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Reader role, e.g. "Travel Planner".
    pub fn role(&self) -> String {
        field_text(&self.0, "role")
    }

    /// Area of expertise.
    pub fn expertise(&self) -> String {
        field_text(&self.0, "expertise")
    }

    /// Any field of the persona.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The persona as given.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// The task the reader is trying to accomplish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobToBeDone(Value);

impl Default for JobToBeDone {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl JobToBeDone {
    /// Create a job from a task description.
    pub fn new(task: impl Into<String>) -> Self {
        Self(object([("task", task.into())]))
    }

    /// Wrap a job value as found in the input.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Task description.
    pub fn task(&self) -> String {
        field_text(&self.0, "task")
    }

    /// Any field of the job.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The job as given.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// The primary input record (`input.json`).
///
/// Unknown top-level fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Reader persona
    #[serde(default)]
    pub persona: Persona,
    /// Job to be done
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
}

impl InputRecord {
    /// Create a record from its parts.
    pub fn new(persona: Persona, job_to_be_done: JobToBeDone) -> Self {
        Self {
            persona,
            job_to_be_done,
        }
    }

    /// Read and parse a record from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| Error::InputRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&data).map_err(|e| Error::InputRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "challenge_info": {"id": "r1"},
            "documents": [{"filename": "a.pdf"}],
            "persona": {"role": "Travel Planner", "expertise": "budget trips"},
            "job_to_be_done": {"task": "Plan a trip of 4 days"}
        }"#;
        let record: InputRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.persona.role(), "Travel Planner");
        assert_eq!(record.persona.expertise(), "budget trips");
        assert_eq!(record.job_to_be_done.task(), "Plan a trip of 4 days");
    }

    #[test]
    fn test_missing_fields_default() {
        let record: InputRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, InputRecord::default());
        assert_eq!(serde_json::to_value(&record.persona).unwrap(), serde_json::json!({}));

        let record: InputRecord = serde_json::from_str(r#"{"persona": {"role": "HR"}}"#).unwrap();
        assert_eq!(record.persona.role(), "HR");
        assert_eq!(record.persona.expertise(), "");
    }

    #[test]
    fn test_persona_echoed_as_given() {
        let json = r#"{"role":"Chef","zeta":1,"alpha":2,"expertise":null}"#;
        let persona: Persona = serde_json::from_str(json).unwrap();
        assert_eq!(persona.get("zeta"), Some(&Value::from(1)));
        assert_eq!(persona.expertise(), "");

        assert_eq!(serde_json::to_string(&persona).unwrap(), json);
    }

    #[test]
    fn test_non_string_fields_are_accepted() {
        let json = r#"{
            "persona": {"role": "Analyst", "expertise": 5},
            "job_to_be_done": {"task": ["compare", "summarize"]}
        }"#;
        let record: InputRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.persona.expertise(), "5");
        assert_eq!(record.job_to_be_done.task(), r#"["compare","summarize"]"#);
        assert_eq!(
            record.persona.as_value(),
            &serde_json::json!({"role": "Analyst", "expertise": 5})
        );
    }

    #[test]
    fn test_non_object_persona_has_empty_fields() {
        let record: InputRecord =
            serde_json::from_str(r#"{"persona": "Chef", "job_to_be_done": null}"#).unwrap();
        assert_eq!(record.persona.role(), "");
        assert_eq!(record.job_to_be_done.task(), "");
        assert_eq!(record.persona.as_value(), &Value::from("Chef"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = InputRecord::from_path("/nonexistent/input.json").unwrap_err();
        assert!(matches!(err, Error::InputRecord { .. }));
    }

    #[test]
    fn test_from_path_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            InputRecord::from_path(&path),
            Err(Error::InputRecord { .. })
        ));
    }
}
