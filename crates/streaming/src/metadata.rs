use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::archive::ArchiveError;

/// Archive metadata document (the TileJSON-like JSON stored in the archive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    /// `None` when the document does not declare its vector layers at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_layers: Option<Vec<VectorLayerInfo>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayerInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<u32>,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl VectorLayerInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            minzoom: None,
            maxzoom: None,
            fields: BTreeMap::new(),
        }
    }
}

impl ArchiveMetadata {
    pub fn from_json(text: &str) -> Result<Self, ArchiveError> {
        serde_json::from_str(text).map_err(|e| ArchiveError::Parse(e.to_string()))
    }

    pub fn with_layers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vector_layers: Some(names.into_iter().map(VectorLayerInfo::new).collect()),
            ..Self::default()
        }
    }

    /// Declared vector-layer ids, if the document lists them.
    pub fn layer_ids(&self) -> Option<BTreeSet<String>> {
        self.vector_layers
            .as_ref()
            .map(|layers| layers.iter().map(|l| l.id.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::ArchiveMetadata;
    use crate::archive::ArchiveError;
    use std::collections::BTreeSet;

    #[test]
    fn parses_tippecanoe_style_metadata() {
        let json = r#"{
            "name": "beaver-scape",
            "format": "pbf",
            "vector_layers": [
                { "id": "owner", "fields": { "d_Mang_Type": "String" }, "minzoom": 0, "maxzoom": 12 },
                { "id": "huc10", "fields": {} }
            ]
        }"#;
        let meta = ArchiveMetadata::from_json(json).expect("parse");
        assert_eq!(meta.name.as_deref(), Some("beaver-scape"));
        let ids = meta.layer_ids().expect("declared");
        assert_eq!(ids, BTreeSet::from(["owner".to_string(), "huc10".to_string()]));
    }

    #[test]
    fn missing_vector_layers_is_undeclared() {
        let meta = ArchiveMetadata::from_json(r#"{ "name": "raster" }"#).expect("parse");
        assert_eq!(meta.layer_ids(), None);
    }

    #[test]
    fn empty_vector_layers_is_declared_empty() {
        let meta = ArchiveMetadata::from_json(r#"{ "vector_layers": [] }"#).expect("parse");
        assert_eq!(meta.layer_ids(), Some(BTreeSet::new()));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            ArchiveMetadata::from_json("{"),
            Err(ArchiveError::Parse(_))
        ));
    }
}
