//! Recurrence metadata carried inside a task's free-text notes.
//!
//! The remote service has no field for recurrence, so the interval and the
//! processed marker travel as a JSON object serialized into `notes`. Nothing
//! outside this module should look at raw notes strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::models::{RecurringTask, TaskRecord};

pub const DEFAULT_INTERVAL_KEY: &str = "interval";
pub const DEFAULT_PROCESSED_KEY: &str = "lastRecurred";

/// Key under which pre-existing plain-text notes are kept when an interval is
/// attached to a task that had prose in its notes.
pub const ORIGINAL_NOTES_KEY: &str = "originalNotes";

/// A notes field that parsed as a JSON object.
///
/// Every key is kept in its original order, recognised or not, so writing the
/// object back never drops what a human or another tool put there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceMetadata {
    fields: Map<String, Value>,
}

impl RecurrenceMetadata {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrites existing keys with the patch's values and appends new ones.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
    }

    pub fn to_notes(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// Reads and writes recurrence metadata using configurable key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataCodec {
    interval_key: String,
    processed_key: String,
}

impl Default for MetadataCodec {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_KEY, DEFAULT_PROCESSED_KEY)
    }
}

impl MetadataCodec {
    pub fn new(interval_key: impl Into<String>, processed_key: impl Into<String>) -> Self {
        Self {
            interval_key: interval_key.into(),
            processed_key: processed_key.into(),
        }
    }

    pub fn interval_key(&self) -> &str {
        &self.interval_key
    }

    pub fn processed_key(&self) -> &str {
        &self.processed_key
    }

    /// Parses notes into metadata.
    ///
    /// Returns `None` for absent notes, prose, malformed JSON and JSON that is
    /// not an object. Humans write in this field too, so none of those are
    /// errors.
    pub fn decode(&self, notes: Option<&str>) -> Option<RecurrenceMetadata> {
        let notes = notes?.trim();
        if !notes.starts_with('{') {
            return None;
        }
        match serde_json::from_str::<Value>(notes) {
            Ok(Value::Object(fields)) => Some(RecurrenceMetadata::from_fields(fields)),
            _ => None,
        }
    }

    /// Serializes `existing` (or an empty object) with `patch` merged over it.
    pub fn encode(&self, existing: Option<&RecurrenceMetadata>, patch: Map<String, Value>) -> String {
        let mut metadata = existing.cloned().unwrap_or_default();
        metadata.merge(patch);
        metadata.to_notes()
    }

    /// The declared interval in days, if the value is a whole number.
    ///
    /// Non-numeric values (`"7"`, `true`, `null`) and fractional numbers are
    /// treated as undeclared. The sign is not checked here.
    pub fn interval(&self, metadata: &RecurrenceMetadata) -> Option<i64> {
        let value = metadata.get(&self.interval_key)?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|days| days.is_finite() && days.fract() == 0.0)
                .filter(|days| days.abs() < i64::MAX as f64)
                .map(|days| days as i64)
        })
    }

    /// Whether the task already spawned its successor. A `null` marker counts as unset.
    pub fn is_processed(&self, metadata: &RecurrenceMetadata) -> bool {
        metadata
            .get(&self.processed_key)
            .is_some_and(|marker| !marker.is_null())
    }

    pub fn last_recurred(&self, metadata: &RecurrenceMetadata) -> Option<DateTime<Utc>> {
        metadata
            .get(&self.processed_key)?
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Notes for the original task once its successor exists.
    ///
    /// Notes that do not decode are treated as an empty object, so the result
    /// always carries the marker.
    pub fn mark_processed(&self, notes: Option<&str>, at: DateTime<Utc>) -> String {
        let existing = self.decode(notes);
        let mut patch = Map::new();
        patch.insert(
            self.processed_key.clone(),
            Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        self.encode(existing.as_ref(), patch)
    }

    /// Folds an interval change into notes for the interactive edit path.
    ///
    /// `Some(days)` sets the interval. JSON-object notes keep all their other
    /// keys; prose is preserved under [`ORIGINAL_NOTES_KEY`]. `None` removes the
    /// interval and, if only preserved prose remains, restores the prose.
    /// Either way the processed marker is dropped so the task can recur again.
    /// Returns the new notes, or `None` when nothing is left.
    pub fn with_interval(&self, notes: Option<&str>, interval: Option<i64>) -> Option<String> {
        let decoded = self.decode(notes);
        match (decoded, interval) {
            (Some(mut metadata), Some(days)) => {
                metadata.set(self.interval_key.clone(), days);
                metadata.remove(&self.processed_key);
                Some(metadata.to_notes())
            }
            (Some(mut metadata), None) => {
                metadata.remove(&self.interval_key);
                metadata.remove(&self.processed_key);
                restore_prose(metadata)
            }
            (None, Some(days)) => {
                let mut metadata = RecurrenceMetadata::default();
                metadata.set(self.interval_key.clone(), days);
                if let Some(text) = notes.filter(|n| !n.trim().is_empty()) {
                    metadata.set(ORIGINAL_NOTES_KEY, text);
                }
                Some(metadata.to_notes())
            }
            (None, None) => notes.map(str::to_string),
        }
    }

    /// Pairs a task with its parsed interval.
    pub fn annotate(&self, task: TaskRecord) -> RecurringTask {
        let interval = self
            .decode(task.notes.as_deref())
            .and_then(|metadata| self.interval(&metadata));
        RecurringTask { task, interval }
    }
}

fn restore_prose(metadata: RecurrenceMetadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    if metadata.fields().len() == 1 {
        if let Some(Value::String(text)) = metadata.get(ORIGINAL_NOTES_KEY) {
            return Some(text.clone());
        }
    }
    Some(metadata.to_notes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn codec() -> MetadataCodec {
        MetadataCodec::default()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(""))]
    #[case::prose(Some("just a reminder"))]
    #[case::malformed(Some("{\"interval\": 7"))]
    #[case::array(Some("[1, 2, 3]"))]
    #[case::number(Some("7"))]
    #[case::string(Some("\"interval\""))]
    #[case::null(Some("null"))]
    fn test_decode_returns_none_for_non_objects(#[case] notes: Option<&str>) {
        assert!(codec().decode(notes).is_none());
    }

    #[test]
    fn test_decode_keeps_unknown_fields_in_order() {
        let metadata = codec()
            .decode(Some(r#"{"owner":"sam","interval":3,"tags":["a"]}"#))
            .unwrap();
        let keys: Vec<&str> = metadata.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["owner", "interval", "tags"]);
        assert_eq!(codec().interval(&metadata), Some(3));
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let metadata = codec().decode(Some("\n  {\"interval\": 2}  \n")).unwrap();
        assert_eq!(codec().interval(&metadata), Some(2));
    }

    #[rstest]
    #[case(json!({"interval": 7}), Some(7))]
    #[case(json!({"interval": 7.0}), Some(7))]
    #[case(json!({"interval": -3}), Some(-3))]
    #[case(json!({"interval": 1.5}), None)]
    #[case(json!({"interval": "7"}), None)]
    #[case(json!({"interval": null}), None)]
    #[case(json!({"interval": true}), None)]
    #[case(json!({"other": 7}), None)]
    fn test_interval_requires_whole_number(#[case] value: Value, #[case] expected: Option<i64>) {
        let metadata = RecurrenceMetadata::from_fields(object(value));
        assert_eq!(codec().interval(&metadata), expected);
    }

    #[test]
    fn test_custom_keys() {
        let codec = MetadataCodec::new("every", "done");
        let metadata = codec.decode(Some(r#"{"every": 4, "interval": 9, "done": "x"}"#)).unwrap();
        assert_eq!(codec.interval(&metadata), Some(4));
        assert!(codec.is_processed(&metadata));
        assert_eq!(codec.interval_key(), "every");
        assert_eq!(codec.processed_key(), "done");
    }

    #[test]
    fn test_processed_marker_presence() {
        let c = codec();
        let marked = c.decode(Some(r#"{"interval":1,"lastRecurred":"2024-01-02T00:00:00Z"}"#)).unwrap();
        let null_marker = c.decode(Some(r#"{"interval":1,"lastRecurred":null}"#)).unwrap();
        let unmarked = c.decode(Some(r#"{"interval":1}"#)).unwrap();

        assert!(c.is_processed(&marked));
        assert!(!c.is_processed(&null_marker));
        assert!(!c.is_processed(&unmarked));
        assert_eq!(
            c.last_recurred(&marked),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_encode_without_existing_starts_empty() {
        let notes = codec().encode(None, object(json!({"lastRecurred": "now"})));
        assert_eq!(notes, r#"{"lastRecurred":"now"}"#);
    }

    #[test]
    fn test_mark_processed_keeps_interval_and_extra_keys() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let notes = codec().mark_processed(Some(r#"{"interval":7,"note":"keep me"}"#), at);
        assert_eq!(
            notes,
            r#"{"interval":7,"note":"keep me","lastRecurred":"2024-03-01T12:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_mark_processed_on_undecodable_notes() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let notes = codec().mark_processed(Some("not json"), at);
        assert_eq!(notes, r#"{"lastRecurred":"2024-03-01T12:00:00.000Z"}"#);
    }

    #[test]
    fn test_with_interval_merges_into_json_notes() {
        let notes = codec().with_interval(
            Some(r#"{"note":"x","interval":2,"lastRecurred":"2024-01-01T00:00:00Z"}"#),
            Some(5),
        );
        assert_eq!(notes.as_deref(), Some(r#"{"note":"x","interval":5}"#));
    }

    #[test]
    fn test_with_interval_wraps_prose() {
        let notes = codec().with_interval(Some("buy the green one"), Some(14));
        assert_eq!(
            notes.as_deref(),
            Some(r#"{"interval":14,"originalNotes":"buy the green one"}"#)
        );
    }

    #[test]
    fn test_with_interval_on_empty_notes() {
        assert_eq!(codec().with_interval(None, Some(1)).as_deref(), Some(r#"{"interval":1}"#));
        assert_eq!(codec().with_interval(Some("  "), Some(1)).as_deref(), Some(r#"{"interval":1}"#));
    }

    #[test]
    fn test_clearing_interval_restores_prose() {
        let c = codec();
        let wrapped = c.with_interval(Some("buy the green one"), Some(14));
        assert_eq!(
            c.with_interval(wrapped.as_deref(), None).as_deref(),
            Some("buy the green one")
        );
        assert_eq!(c.with_interval(Some(r#"{"interval":3}"#), None), None);
        assert_eq!(
            c.with_interval(Some(r#"{"interval":3,"a":1}"#), None).as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert_eq!(c.with_interval(Some("plain"), None).as_deref(), Some("plain"));
    }

    #[test]
    fn test_annotate() {
        let task = TaskRecord {
            notes: Some(r#"{"interval":7}"#.to_string()),
            ..Default::default()
        };
        let annotated = codec().annotate(task);
        assert_eq!(annotated.interval, Some(7));
        assert!(annotated.is_recurring());

        let plain = codec().annotate(TaskRecord::default());
        assert_eq!(plain.interval, None);
        assert!(!plain.is_recurring());
    }

    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z ]{0,12}".prop_map(Value::String),
        ]
    }

    fn json_object() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::vec(("[a-zA-Z]{1,8}", json_leaf()), 0..6)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(notes in ".*") {
            let c = codec();
            if let Some(metadata) = c.decode(Some(&notes)) {
                let _ = c.interval(&metadata);
            }
        }

        #[test]
        fn prop_encode_with_empty_patch_round_trips(fields in json_object()) {
            let c = codec();
            let original = RecurrenceMetadata::from_fields(fields);
            let notes = c.encode(Some(&original), Map::new());
            prop_assert_eq!(c.decode(Some(&notes)), Some(original));
        }

        #[test]
        fn prop_encode_merge_law(base in json_object(), patch in json_object()) {
            let c = codec();
            let original = RecurrenceMetadata::from_fields(base.clone());
            let notes = c.encode(Some(&original), patch.clone());
            let decoded = c.decode(Some(&notes)).unwrap();

            for (key, value) in &patch {
                prop_assert_eq!(decoded.get(key), Some(value));
            }
            for (key, value) in &base {
                if !patch.contains_key(key) {
                    prop_assert_eq!(decoded.get(key), Some(value));
                }
            }
        }
    }
}
