//! Completion data provider
//!
//! This module provides the trait the engine asks for candidate data and the
//! HIVE implementation backed by the element schema and HiveAPIQuery.

use serde::Serialize;
use serde_json::Value;

use crate::error::QueryError;
use crate::query::{ApiQuery, QueryMode, QueryRequest};
use crate::schema::SchemaRegistry;

/// Parameter whose values are looked up by DIS enumeration prefix
pub const DIS_ENUMERATION: &str = "disEnumeration";

/// Shortest typed prefix that triggers a DIS enumeration lookup
pub const MIN_DIS_PREFIX: usize = 3;

/// Completion pair handed to the editor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CompletionPair {
    /// Text shown in the completion popup, optionally `name\tdescription`
    pub label: String,
    /// Text inserted when the candidate is accepted
    pub insert: String,
}

impl CompletionPair {
    pub fn new(label: impl Into<String>, insert: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            insert: insert.into(),
        }
    }

    /// Pair whose label and insertion text are the same word
    pub fn word(word: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            label: word.clone(),
            insert: word,
        }
    }

    /// Wrap the insertion text in double quotes
    pub fn quoted(self) -> Self {
        Self {
            insert: format!("\"{}\"", self.insert),
            ..self
        }
    }
}

/// A parameter (channel) of an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: String,
    pub description: String,
}

impl ParamInfo {
    pub fn to_pair(&self) -> CompletionPair {
        CompletionPair::new(format!("{}\t{}", self.name, self.description), &self.name)
    }
}

/// A known value of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue {
    pub value: String,
    pub description: String,
    /// Marked with `*` in the label
    pub is_default: bool,
    /// Text inserted when chosen; may omit what the user already typed
    pub insert: String,
}

impl ParamValue {
    pub fn to_pair(&self) -> CompletionPair {
        let marker = if self.is_default { "*" } else { "" };
        CompletionPair::new(
            format!("{}\t{marker}{}", self.value, self.description),
            &self.insert,
        )
    }
}

/// Trait for providing completion data
///
/// Every call may fail; the engine treats a failure as "no candidates".
pub trait CompletionDataProvider: Send + Sync {
    /// Object types under the namespace `prefix` (e.g. `Sensor::`), with the
    /// namespace removed from label and insertion text
    fn object_types(&self, prefix: &str) -> Result<Vec<CompletionPair>, QueryError>;

    /// Parameters accepted by `object_type`
    fn param_names(&self, object_type: &str) -> Result<Vec<ParamInfo>, QueryError>;

    /// Values for parameter `param_name` of `object_type`; `prefix` is the
    /// value typed so far
    fn param_values(
        &self,
        param_name: &str,
        object_type: &str,
        prefix: &str,
    ) -> Result<Vec<ParamValue>, QueryError>;

    /// Elements allowed directly under `element`
    fn element_children(&self, element: &str) -> Result<Vec<String>, QueryError>;

    /// Attributes allowed on `element`
    fn element_attributes(&self, element: &str) -> Result<Vec<String>, QueryError>;
}

/// HIVE provider: elements from the schema, everything else from HiveAPIQuery
pub struct HiveDataProvider {
    schema: SchemaRegistry,
    query: Box<dyn ApiQuery>,
}

impl HiveDataProvider {
    pub fn new(schema: SchemaRegistry, query: Box<dyn ApiQuery>) -> Self {
        Self { schema, query }
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Run a query that must answer with a JSON array
    fn rows(&self, request: QueryRequest) -> Result<Vec<Value>, QueryError> {
        match self.query.query(&request)? {
            Value::Array(rows) => Ok(rows),
            other => Err(QueryError::InvalidOutput(format!(
                "expected a JSON array, got {other}"
            ))),
        }
    }
}

/// Render a JSON scalar the way it should appear in the editor
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `[first, second, ...]` rows, skipping anything shorter
fn columns(row: &Value) -> Option<(String, String)> {
    Some((text(row.get(0)?), text(row.get(1)?)))
}

fn is_default_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(flag) => flag.as_i64() == Some(1),
        None => false,
    }
}

impl CompletionDataProvider for HiveDataProvider {
    fn object_types(&self, prefix: &str) -> Result<Vec<CompletionPair>, QueryError> {
        let rows = self.rows(QueryRequest::new(QueryMode::Type).object_type(prefix))?;
        Ok(rows
            .iter()
            .map(|row| CompletionPair::word(text(row).replacen(prefix, "", 1)))
            .collect())
    }

    fn param_names(&self, object_type: &str) -> Result<Vec<ParamInfo>, QueryError> {
        let rows = self.rows(QueryRequest::new(QueryMode::Channel).object_type(object_type))?;
        Ok(rows
            .iter()
            .filter_map(columns)
            .map(|(name, description)| ParamInfo { name, description })
            .collect())
    }

    fn param_values(
        &self,
        param_name: &str,
        object_type: &str,
        prefix: &str,
    ) -> Result<Vec<ParamValue>, QueryError> {
        if param_name == DIS_ENUMERATION {
            if prefix.chars().count() < MIN_DIS_PREFIX {
                tracing::trace!(prefix, "DIS prefix too short, skipping lookup");
                return Ok(Vec::new());
            }

            let request = QueryRequest::new(QueryMode::Dis)
                .object_type(object_type)
                .channel(param_name)
                .dis(prefix);
            let rows = self.rows(request)?;
            return Ok(rows
                .iter()
                .filter_map(|row| {
                    let (value, description) = columns(row)?;
                    Some(ParamValue {
                        insert: value.replacen(prefix, "", 1),
                        is_default: is_default_flag(row.get(2)),
                        value,
                        description,
                    })
                })
                .collect());
        }

        let request = QueryRequest::new(QueryMode::Value)
            .object_type(object_type)
            .channel(param_name);
        let rows = self.rows(request)?;
        Ok(rows
            .iter()
            .filter_map(columns)
            .map(|(value, description)| ParamValue {
                insert: value.clone(),
                value,
                description,
                is_default: false,
            })
            .collect())
    }

    fn element_children(&self, element: &str) -> Result<Vec<String>, QueryError> {
        Ok(self.schema.children(element).to_vec())
    }

    fn element_attributes(&self, element: &str) -> Result<Vec<String>, QueryError> {
        Ok(self.schema.attributes(element).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Answers every query with a fixed value and records the requests
    struct StaticQuery {
        answer: Value,
        seen: Mutex<Vec<QueryRequest>>,
    }

    impl StaticQuery {
        fn new(answer: Value) -> Self {
            Self {
                answer,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ApiQuery for Arc<StaticQuery> {
        fn query(&self, request: &QueryRequest) -> Result<Value, QueryError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.answer.clone())
        }
    }

    fn provider(answer: Value) -> (HiveDataProvider, Arc<StaticQuery>) {
        let query = Arc::new(StaticQuery::new(answer));
        (
            HiveDataProvider::new(SchemaRegistry::hive(), Box::new(Arc::clone(&query))),
            query,
        )
    }

    fn last_request(query: &StaticQuery) -> QueryRequest {
        query.seen.lock().unwrap().last().cloned().unwrap()
    }

    #[test]
    fn test_object_types_strip_namespace() {
        let (provider, query) = provider(json!(["Sensor::Radar", "Sensor::Sonar"]));
        let pairs = provider.object_types("Sensor::").unwrap();
        assert_eq!(
            pairs,
            vec![CompletionPair::word("Radar"), CompletionPair::word("Sonar")]
        );
        assert_eq!(
            last_request(&query).args(),
            vec!["type", "--type=Sensor::"]
        );
    }

    #[test]
    fn test_object_types_without_prefix() {
        let (provider, query) = provider(json!(["Platform", "Sensor::Radar"]));
        let pairs = provider.object_types("").unwrap();
        assert_eq!(pairs[1], CompletionPair::word("Sensor::Radar"));
        assert_eq!(last_request(&query).args(), vec!["type"]);
    }

    #[test]
    fn test_param_names() {
        let (provider, query) = provider(json!([["range", "Detection range"], ["bad"]]));
        let params = provider.param_names("Sensor::Radar").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(
            params[0].to_pair(),
            CompletionPair::new("range\tDetection range", "range")
        );
        assert_eq!(
            last_request(&query).args(),
            vec!["channel", "--type=Sensor::Radar"]
        );
    }

    #[test]
    fn test_param_values_render_non_strings() {
        let (provider, query) = provider(json!([["10", 1.5], [3, "three"]]));
        let values = provider.param_values("range", "Sensor::Radar", "").unwrap();
        assert_eq!(values[0].to_pair(), CompletionPair::new("10\t1.5", "10"));
        assert_eq!(values[1].to_pair(), CompletionPair::new("3\tthree", "3"));
        assert_eq!(
            last_request(&query).args(),
            vec!["value", "--type=Sensor::Radar", "--channel=range"]
        );
    }

    #[test]
    fn test_dis_enumeration_needs_three_characters() {
        let (provider, query) = provider(json!([["1.2.3", "Tank", 1]]));
        assert!(provider.param_values(DIS_ENUMERATION, "Entity", "1.").unwrap().is_empty());
        assert!(query.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dis_enumeration_values() {
        let (provider, query) = provider(json!([["1.2.3", "Tank", 1], ["1.2.4", "Truck", 0]]));
        let values = provider.param_values(DIS_ENUMERATION, "Entity", "1.2").unwrap();

        assert_eq!(values[0].to_pair(), CompletionPair::new("1.2.3\t*Tank", ".3"));
        assert_eq!(values[1].to_pair(), CompletionPair::new("1.2.4\tTruck", ".4"));
        assert_eq!(
            last_request(&query).args(),
            vec!["dis", "--type=Entity", "--channel=disEnumeration", "--dis=1.2"]
        );
    }

    #[test]
    fn test_non_array_answer_is_invalid() {
        let (provider, _) = provider(json!({"error": "boom"}));
        let err = provider.object_types("").unwrap_err();
        assert!(matches!(err, QueryError::InvalidOutput(_)));
    }

    #[test]
    fn test_elements_come_from_schema() {
        let (provider, query) = provider(json!([]));
        assert_eq!(provider.element_children("root").unwrap(), vec!["hive"]);
        assert!(provider.element_attributes("param").unwrap().contains(&"value".to_string()));
        assert!(query.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_quoted_pair() {
        let pair = CompletionPair::word("Radar").quoted();
        assert_eq!(pair.label, "Radar");
        assert_eq!(pair.insert, "\"Radar\"");
    }
}
