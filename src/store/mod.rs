//! Firestore document store (append-only, best effort)
//!
//! Every workflow write is fire-and-forget from the caller's perspective:
//! handlers log failures and keep going. Documents get a client-side
//! RFC 3339 `createdAt` field; the REST createDocument call cannot attach
//! a server transform without a full commit RPC.

use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::config::FirestoreConfig;

const STORE_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin REST client for Firestore document writes
pub struct DocumentStore {
    project_id: String,
    api_key: String,
    http: reqwest::Client,
}

impl DocumentStore {
    pub fn new(config: FirestoreConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(STORE_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            project_id: config.project_id,
            api_key: config.api_key,
            http,
        }
    }

    /// Append a document to a collection; returns the server-assigned name
    pub async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String, String> {
        let url = format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents/{}",
            self.project_id, collection
        );

        let mut typed = Map::new();
        for (key, value) in fields {
            typed.insert(key, to_firestore_value(&value));
        }
        typed.insert(
            "createdAt".to_string(),
            json!({ "timestampValue": chrono::Utc::now().to_rfc3339() }),
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "fields": typed }))
            .send()
            .await
            .map_err(|e| format!("Failed to write to {}: {}", collection, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Firestore API error ({}): {}", status, text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(data["name"].as_str().unwrap_or("").to_string())
    }
}

/// Map a plain JSON value onto Firestore's typed value encoding
fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::String(s) => json!({ "stringValue": s }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            json!({ "integerValue": n.to_string() })
        }
        Value::Number(n) => json!({ "doubleValue": n.as_f64() }),
        Value::Null => json!({ "nullValue": null }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Persist best-effort: log the outcome, never propagate
pub async fn persist(store: Option<&DocumentStore>, collection: &str, fields: Map<String, Value>) {
    let Some(store) = store else {
        return;
    };
    match store.add(collection, fields).await {
        Ok(name) => log::info!("Saved document to {}: {}", collection, name),
        Err(e) => log::warn!("Failed to save document to {}: {}", collection, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_bool_encoding() {
        assert_eq!(
            to_firestore_value(&json!("hello")),
            json!({ "stringValue": "hello" })
        );
        assert_eq!(
            to_firestore_value(&json!(true)),
            json!({ "booleanValue": true })
        );
    }

    #[test]
    fn test_number_encoding() {
        assert_eq!(
            to_firestore_value(&json!(42)),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            to_firestore_value(&json!(1.5)),
            json!({ "doubleValue": 1.5 })
        );
    }

    #[test]
    fn test_nested_object_encoding() {
        let value = json!({ "inner": { "count": 2 } });
        let encoded = to_firestore_value(&value);
        assert_eq!(
            encoded["mapValue"]["fields"]["inner"]["mapValue"]["fields"]["count"],
            json!({ "integerValue": "2" })
        );
    }

    #[tokio::test]
    async fn test_persist_without_store_is_noop() {
        // Must not panic or log an error path
        persist(None, "ideas", Map::new()).await;
    }
}
