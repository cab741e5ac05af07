use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter};
use uuid::Uuid;

use crate::shared::AppError;

/// A schemaless JSON document
pub type Document = Map<String, Value>;

/// Key under which every stored document keeps its identifier
pub const ID_FIELD: &str = "_id";

/// Named collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Users,
    Posts,
    Tags,
    Announcements,
}

/// Acknowledgment returned after inserting a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Acknowledgment returned after updating (or upserting) a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn upserted(id: String) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }
}

/// Returns the document's `_id`, assigning a fresh UUID first if it has none.
/// Ids must be strings; any other `_id` value is rejected.
pub fn ensure_id(document: &mut Document) -> Result<String, AppError> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(AppError::BadRequest(format!(
            "{} must be a string, got {}",
            ID_FIELD, other
        ))),
        None => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
    }
}

/// Equality match: every filter field must be present and equal
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Next value of a counter field after adding `by`.
///
/// A missing or `null` counter starts from zero. Integer counters stay
/// integers and must not leave the `i64` range; other numbers are added as
/// floats. Anything else is not a counter.
pub fn incremented_counter(current: Option<&Value>, by: i64) -> Result<Value, AppError> {
    let not_a_counter =
        |reason: &str| AppError::DatabaseError(format!("cannot increment: {}", reason));

    match current {
        None | Some(Value::Null) => Ok(Value::from(by)),
        Some(Value::Number(number)) if number.is_i64() => number
            .as_i64()
            .and_then(|value| value.checked_add(by))
            .map(Value::from)
            .ok_or_else(|| not_a_counter("counter overflow")),
        Some(Value::Number(number)) if number.is_u64() => {
            Err(not_a_counter("counter out of range"))
        }
        Some(Value::Number(number)) => number
            .as_f64()
            .and_then(|value| serde_json::Number::from_f64(value + by as f64))
            .map(Value::Number)
            .ok_or_else(|| not_a_counter("counter is not finite")),
        Some(other) => Err(not_a_counter(&format!("{} is not a number", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_collection_names() {
        let names: Vec<String> = Collection::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["users", "posts", "tags", "announcements"]);
        assert_eq!(Collection::Posts.as_ref(), "posts");
    }

    #[test]
    fn test_ensure_id_keeps_existing_id() {
        let mut document = doc(json!({ "_id": "abc", "title": "x" }));
        assert_eq!(ensure_id(&mut document).unwrap(), "abc");
    }

    #[rstest]
    #[case::number(json!(5))]
    #[case::object(json!({ "oid": "abc" }))]
    #[case::null(json!(null))]
    fn test_ensure_id_rejects_non_string_id(#[case] id: Value) {
        let mut document = doc(json!({ "_id": id.clone(), "title": "x" }));

        let result = ensure_id(&mut document);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(document[ID_FIELD], id);
    }

    #[test]
    fn test_ensure_id_assigns_uuid() {
        let mut document = doc(json!({ "title": "x" }));
        let id = ensure_id(&mut document).unwrap();

        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(document[ID_FIELD], json!(id));
    }

    #[test]
    fn test_matches_filter() {
        let post = doc(json!({ "title": "x", "authorEmail": "a@b.com" }));

        assert!(matches_filter(&post, &Document::new()));
        assert!(matches_filter(&post, &doc(json!({ "authorEmail": "a@b.com" }))));
        assert!(!matches_filter(&post, &doc(json!({ "authorEmail": "c@d.com" }))));
        assert!(!matches_filter(&post, &doc(json!({ "tag": "rust" }))));
        assert!(!matches_filter(&post, &doc(json!({ "tag": null }))));
    }

    #[rstest]
    #[case::missing(None, json!(1))]
    #[case::null(Some(json!(null)), json!(1))]
    #[case::integer(Some(json!(2)), json!(3))]
    #[case::negative(Some(json!(-4)), json!(-3))]
    #[case::float(Some(json!(2.0)), json!(3.0))]
    #[case::fraction(Some(json!(1.5)), json!(2.5))]
    #[case::near_max(Some(json!(i64::MAX - 1)), json!(i64::MAX))]
    fn test_incremented_counter(#[case] current: Option<Value>, #[case] expected: Value) {
        assert_eq!(incremented_counter(current.as_ref(), 1).unwrap(), expected);
    }

    #[rstest]
    #[case::overflow(json!(i64::MAX))]
    #[case::beyond_i64(json!(u64::MAX))]
    #[case::string(json!("7"))]
    #[case::boolean(json!(true))]
    #[case::array(json!([1]))]
    fn test_incremented_counter_rejects(#[case] current: Value) {
        let result = incremented_counter(Some(&current), 1);
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[test]
    fn test_acknowledgment_serialization() {
        let insert = InsertOneResult {
            acknowledged: true,
            inserted_id: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({ "acknowledged": true, "insertedId": "abc" })
        );

        let upsert = UpdateResult::upserted("abc".to_string());
        assert_eq!(
            serde_json::to_value(&upsert).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 0,
                "modifiedCount": 0,
                "upsertedCount": 1,
                "upsertedId": "abc"
            })
        );
    }
}
