use serde::{Deserialize, Serialize};

/// A published document from `POST /students/{id}/documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "pubId")]
    pub pub_id: Option<i64>,
    #[serde(rename = "pubDT")]
    pub pub_dt: Option<String>,
    #[serde(rename = "evtCode")]
    pub evt_code: Option<String>,
    #[serde(rename = "cntId")]
    pub cnt_id: Option<i64>,
    pub desc: Option<String>,
    /// Opaque hash used by the check/read endpoints.
    pub hash: Option<String>,
}

/// Availability flag from `POST /students/{id}/documents/check/{hash}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStatus {
    #[serde(default)]
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let json = r#"{"pubId": 5, "evtCode": "DOCPAG", "desc": "Pagella", "hash": "abc123"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_document_status_defaults_unavailable() {
        let status: DocumentStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.available);
    }
}
