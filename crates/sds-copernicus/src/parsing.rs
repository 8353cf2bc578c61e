//! JSON parsing for hub responses.
//!
//! The OData endpoint wraps its payload in `d` and encodes 64-bit integers as
//! strings. The OpenSearch endpoint collapses single-element lists into plain
//! objects and omits `entry` when nothing matched.

use chrono::{DateTime, Utc};
use sds_core::{ProductMetadata, ProductSummary};
use serde_json::Value;

use crate::error::{CopernicusError, CopernicusResult};

// ============================================================================
// OData
// ============================================================================

/// Parse an OData product document into [`ProductMetadata`].
pub fn parse_product_metadata(json: &Value) -> CopernicusResult<ProductMetadata> {
    let product = json.get("d").unwrap_or(json);

    let id = product
        .get("Id")
        .and_then(Value::as_str)
        .ok_or_else(|| CopernicusError::invalid_response("product has no Id"))?
        .to_string();
    let title = product
        .get("Name")
        .and_then(Value::as_str)
        .ok_or_else(|| CopernicusError::invalid_response("product has no Name"))?
        .to_string();
    let size = product.get("ContentLength").and_then(as_u64).unwrap_or(0);
    // Older hub versions omit the flag; their products are always online.
    let online = product
        .get("Online")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let checksum = product
        .get("Checksum")
        .and_then(|c| c.get("Value"))
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_ascii_lowercase);

    Ok(ProductMetadata {
        id,
        title,
        size,
        online,
        checksum,
    })
}

/// Extract the hub's message from an error body, falling back to the raw text.
pub fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message/value")
                .or_else(|| json.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn as_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

// ============================================================================
// OpenSearch
// ============================================================================

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub total: u64,
    pub products: Vec<ProductSummary>,
}

/// Parse an OpenSearch JSON feed.
pub fn parse_search_page(json: &Value) -> CopernicusResult<SearchPage> {
    let feed = json
        .get("feed")
        .ok_or_else(|| CopernicusError::invalid_response("search response has no feed"))?;
    let total = feed
        .get("opensearch:totalResults")
        .and_then(as_u64)
        .unwrap_or(0);

    let products = one_or_many(feed.get("entry"))
        .into_iter()
        .map(parse_entry)
        .collect::<CopernicusResult<Vec<_>>>()?;

    Ok(SearchPage { total, products })
}

fn parse_entry(entry: &Value) -> CopernicusResult<ProductSummary> {
    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| CopernicusError::invalid_response("search entry has no id"))?
        .to_string();
    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let sensing_start = named_content(entry, "date", "beginposition")
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    let cloud_cover = named_content(entry, "double", "cloudcoverpercentage")
        .and_then(|s| s.trim().parse().ok());

    Ok(ProductSummary {
        id,
        title,
        sensing_start,
        cloud_cover,
    })
}

/// `entry[kind]` is a list (or single object) of `{name, content}` pairs.
fn named_content<'a>(entry: &'a Value, kind: &str, name: &str) -> Option<&'a str> {
    one_or_many(entry.get(kind))
        .into_iter()
        .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
        .and_then(|item| item.get("content"))
        .and_then(Value::as_str)
}

fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_from_odata() {
        let json = json!({"d": {
            "Id": "8df46c9e-a20c-43db-a19a-4240c2ed3b8b",
            "Name": "S2A_MSIL1C_20220104T103431_N0301_R108_T32UMA_20220104T123507",
            "ContentLength": "812345678",
            "Online": false,
            "Checksum": {"Algorithm": "MD5", "Value": "9B2E4C4A1E1D3F0A"}
        }});

        let meta = parse_product_metadata(&json).unwrap();

        assert_eq!(meta.id, "8df46c9e-a20c-43db-a19a-4240c2ed3b8b");
        assert_eq!(meta.size, 812_345_678);
        assert!(!meta.online);
        assert_eq!(meta.checksum.as_deref(), Some("9b2e4c4a1e1d3f0a"));
    }

    #[test]
    fn metadata_defaults_to_online_without_checksum() {
        let json = json!({"d": {"Id": "x", "Name": "y", "ContentLength": 10}});

        let meta = parse_product_metadata(&json).unwrap();

        assert!(meta.online);
        assert_eq!(meta.size, 10);
        assert!(meta.checksum.is_none());
    }

    #[test]
    fn metadata_requires_name() {
        let json = json!({"d": {"Id": "x"}});
        assert!(matches!(
            parse_product_metadata(&json),
            Err(CopernicusError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn error_message_prefers_odata_text() {
        let body = r#"{"error":{"code":null,"message":{"lang":"en","value":"java.lang.NullPointerException"}}}"#;
        assert_eq!(parse_error_message(body), "java.lang.NullPointerException");
        assert_eq!(parse_error_message("  Service down \n"), "Service down");
    }

    #[test]
    fn search_page_with_list_entries() {
        let json = json!({"feed": {
            "opensearch:totalResults": "2",
            "entry": [
                {
                    "id": "a", "title": "S2A_A",
                    "date": [{"name": "ingestiondate", "content": "2022-01-05T00:00:00Z"},
                             {"name": "beginposition", "content": "2022-01-04T10:34:31.024Z"}],
                    "double": {"name": "cloudcoverpercentage", "content": "12.5"}
                },
                {"id": "b", "title": "S2B_B"}
            ]
        }});

        let page = parse_search_page(&json).unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].cloud_cover, Some(12.5));
        assert_eq!(
            page.products[0].sensing_start.unwrap().to_rfc3339(),
            "2022-01-04T10:34:31.024+00:00"
        );
        assert!(page.products[1].sensing_start.is_none());
    }

    #[test]
    fn search_page_with_single_entry_object() {
        let json = json!({"feed": {"opensearch:totalResults": "1", "entry": {"id": "only", "title": "t"}}});
        let page = parse_search_page(&json).unwrap();
        assert_eq!(page.products[0].id, "only");
    }

    #[test]
    fn empty_search_page() {
        let json = json!({"feed": {"opensearch:totalResults": "0"}});
        let page = parse_search_page(&json).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.products.is_empty());
    }
}
