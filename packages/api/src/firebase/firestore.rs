//! Firestore REST documents.
//!
//! Firestore wraps every value in a typed envelope (`{"stringValue": "..."}`,
//! `{"mapValue": {"fields": {...}}}`, ...). Profiles are plain JSON objects in the
//! rest of the crate, so this module converts in both directions and performs the
//! merge-write (`PATCH` with one `updateMask.fieldPaths` per written key) and
//! the `documents:runQuery` read used for profile listings.

use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};

use super::identity::parse_error;
use crate::backend::{DocumentQuery, StoredDocument};
use crate::error::AuthError;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone, Debug)]
pub(crate) struct FirestoreClient {
    http: Client,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(http: Client, project_id: String) -> Self {
        Self { http, project_id }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{FIRESTORE_URL}/projects/{}/databases/(default)/documents/{collection}/{id}",
            self.project_id
        )
    }

    fn query_url(&self) -> String {
        format!(
            "{FIRESTORE_URL}/projects/{}/databases/(default)/documents:runQuery",
            self.project_id
        )
    }

    pub async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
        id_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        let body = json!({ "fields": encode_fields(&fields) });

        let mut request = self
            .http
            .patch(self.document_url(collection, id))
            .query(&mask)
            .json(&body);
        if let Some(token) = id_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from(response).await)
    }

    pub async fn get(
        &self,
        collection: &str,
        id: &str,
        id_token: Option<&str>,
    ) -> Result<Option<Map<String, Value>>, AuthError> {
        let mut request = self.http.get(self.document_url(collection, id));
        if let Some(token) = id_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let document: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Backend(format!("Unexpected response: {e}")))?;
        Ok(Some(decode_document(&document)))
    }

    pub async fn run_query(
        &self,
        query: &DocumentQuery,
        id_token: Option<&str>,
    ) -> Result<Vec<StoredDocument>, AuthError> {
        let mut request = self
            .http
            .post(self.query_url())
            .json(&structured_query(query));
        if let Some(token) = id_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| AuthError::Backend(format!("Unexpected response: {e}")))?;
        Ok(decode_query_rows(&rows))
    }
}

/// Request body for `documents:runQuery`.
fn structured_query(query: &DocumentQuery) -> Value {
    let mut structured = json!({
        "from": [{ "collectionId": query.collection }],
        "limit": query.limit,
    });
    if let Some((field, value)) = &query.filter {
        structured["where"] = json!({
            "fieldFilter": {
                "field": { "fieldPath": field },
                "op": "EQUAL",
                "value": encode_value(value),
            }
        });
    }
    if let Some(field) = &query.order_by_desc {
        structured["orderBy"] = json!([{
            "field": { "fieldPath": field },
            "direction": "DESCENDING",
        }]);
    }
    json!({ "structuredQuery": structured })
}

/// Rows without a `document` (read-time markers, empty results) are skipped.
fn decode_query_rows(rows: &[Value]) -> Vec<StoredDocument> {
    rows.iter()
        .filter_map(|row| row.get("document"))
        .filter_map(|document| {
            let name = document.get("name")?.as_str()?;
            let id = name.rsplit('/').next()?.to_string();
            Some(StoredDocument {
                id,
                fields: decode_document(document),
            })
        })
        .collect()
}

async fn error_from(response: reqwest::Response) -> AuthError {
    let status = response.status();
    match response.text().await {
        Ok(text) => parse_error(&text)
            .unwrap_or_else(|| AuthError::Backend(format!("Request failed ({status})"))),
        Err(e) => AuthError::Network(e.to_string()),
    }
}

/// Wrap plain JSON fields in Firestore value envelopes.
pub(crate) fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Unwrap the `fields` of a Firestore document into plain JSON.
pub(crate) fn decode_document(document: &Value) -> Map<String, Value> {
    match document.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields),
        _ => Map::new(),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner.clone(),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect())
                .unwrap_or_default();
            Value::Array(values)
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        },
        _ => Value::Null,
    }
}
