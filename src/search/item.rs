use serde::{Deserialize, Serialize};

/// Read-only projection of a catalog entry, used for display and selection.
///
/// `value` is unique within one lookup response only. Result sets are
/// replaced wholesale, so ids are never compared across batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    /// Stable identifier, also the product route target
    pub value: String,
    pub name: String,
    pub set_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    /// Thumbnail reference; absent renders no thumbnail
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let item = SearchItem {
            value: "1".to_string(),
            name: "Dark Magician".to_string(),
            set_code: "LOB-005".to_string(),
            rarity: Some("UR".to_string()),
            image_url: Some("/a.png".to_string()),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["setCode"], "LOB-005");
        assert_eq!(json["imageUrl"], "/a.png");

        let parsed: SearchItem =
            serde_json::from_str(r#"{"value":"2","name":"Kuriboh","setCode":"MRD-071","imageUrl":null}"#)
                .unwrap();
        assert!(parsed.rarity.is_none());
        assert!(parsed.image_url.is_none());
    }
}
