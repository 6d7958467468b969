//! Web search records and the provider trait

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;

/// One raw hit returned by a web search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebSearchRecord {
    PlainText(String),
    Structured(Map<String, Value>),
}

impl WebSearchRecord {
    /// Wrap the record as a document.
    ///
    /// Content is the title, else the content field, else the whole record
    /// rendered as JSON. Structured records become the metadata verbatim.
    pub fn into_document(self) -> Document {
        match self {
            Self::PlainText(text) => {
                Document::new(text).with_metadata("source", Value::from("web_search"))
            }
            Self::Structured(record) => {
                let content = field_text(&record, "title")
                    .or_else(|| field_text(&record, "content"))
                    .unwrap_or_else(|| Value::Object(record.clone()).to_string());
                let metadata: HashMap<String, Value> = record.into_iter().collect();

                Document::new(content).with_all_metadata(metadata)
            }
        }
    }
}

fn field_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Live web search used as the corrective retrieval source
#[async_trait]
pub trait WebSearchProvider: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchRecord>, DomainError>;

    fn provider_name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wraps_structured_and_plain_records() {
        let records: Vec<WebSearchRecord> =
            serde_json::from_value(json!([{"title": "T1", "url": "http://x"}, "raw string"]))
                .unwrap();

        let docs: Vec<Document> = records.into_iter().map(WebSearchRecord::into_document).collect();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content(), "T1");
        assert_eq!(
            serde_json::to_value(docs[0].metadata()).unwrap(),
            json!({"title": "T1", "url": "http://x"})
        );
        assert_eq!(docs[1].content(), "raw string");
        assert_eq!(
            serde_json::to_value(docs[1].metadata()).unwrap(),
            json!({"source": "web_search"})
        );
    }

    #[test]
    fn test_content_used_when_title_missing_or_empty() {
        let record: WebSearchRecord =
            serde_json::from_value(json!({"title": "", "content": "body", "url": "u"})).unwrap();

        assert_eq!(record.into_document().content(), "body");
    }

    #[test]
    fn test_whole_record_rendered_without_title_or_content() {
        let record: WebSearchRecord = serde_json::from_value(json!({"url": "http://x"})).unwrap();
        let doc = record.into_document();

        assert_eq!(doc.content(), r#"{"url":"http://x"}"#);
        assert_eq!(doc.metadata().get("url"), Some(&json!("http://x")));
    }
}
