//! Generic document tree and the decoders that produce it.
//!
//! Every supported format is lowered into [`Document`], so reference
//! classification never has to care where a value came from.

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::fmt;
use std::fs;
use std::path::Path;

use super::format::DocumentFormat;

/// A decoded document: maps, sequences and scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Key/value pairs in source order. Non-string keys are stringified.
    Map(Vec<(String, Document)>),
    Sequence(Vec<Document>),
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Why a file produced no document.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("file is not valid UTF-8")]
    Encoding,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Read and decode a file, choosing the format from its extension.
pub fn decode_file(path: &Path) -> Result<Document, DecodeError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| DecodeError::Encoding)?;
    decode_str(&content, DocumentFormat::from_path(path))
}

/// Decode text in a known (or sniffed) format.
pub fn decode_str(content: &str, format: DocumentFormat) -> Result<Document, DecodeError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    match format {
        DocumentFormat::Yaml => Ok(decode_yaml(content)?),
        DocumentFormat::Json => Ok(decode_json(content)?),
        DocumentFormat::Toml => Ok(decode_toml(content)?),
        DocumentFormat::Sniff => match decode_json(content) {
            Ok(doc) => Ok(doc),
            Err(_) => Ok(decode_yaml(content)?),
        },
    }
}

fn decode_json(content: &str) -> Result<Document, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(value.into())
}

/// Multi-document streams become a sequence of their documents.
fn decode_yaml(content: &str) -> Result<Document, serde_yaml::Error> {
    let mut docs = Vec::new();
    for de in serde_yaml::Deserializer::from_str(content) {
        docs.push(Document::deserialize(de)?);
    }
    Ok(match docs.len() {
        0 => Document::Null,
        1 => docs.swap_remove(0),
        _ => Document::Sequence(docs),
    })
}

fn decode_toml(content: &str) -> Result<Document, toml::de::Error> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(Document::from(toml::Value::Table(table)))
}

impl Document {
    /// The string payload, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text used when this value appears as a mapping key.
    fn key_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Sequence(items) => {
                let items: Vec<_> = items.iter().map(Self::key_text).collect();
                format!("[{}]", items.join(", "))
            }
            Self::Map(pairs) => {
                let pairs: Vec<_> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.key_text()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }
}

// ─── Deserialization ────────────────────────────────────────

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Document, E> {
        Ok(Document::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Document, E> {
        Ok(Document::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Document, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Document::Integer(i),
            Err(_) => Document::Float(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Document, E> {
        Ok(Document::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Document, E> {
        Ok(Document::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Document, E> {
        Ok(Document::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    /// A repeated key keeps its first position and its last value.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut pairs: Vec<(String, Document)> = Vec::new();
        while let Some((key, value)) = map.next_entry::<Document, Document>()? {
            let key = key.key_text();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
        Ok(Document::Map(pairs))
    }

    /// `!Ref foo.yaml` and friends: keep the tagged value.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Document, A::Error> {
        let (_tag, variant): (String, _) = data.variant()?;
        variant.newtype_variant()
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<toml::Value> for Document {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::String(s) => Self::String(s),
            Value::Integer(i) => Self::Integer(i),
            Value::Float(f) => Self::Float(f),
            Value::Boolean(b) => Self::Bool(b),
            Value::Datetime(dt) => Self::String(dt.to_string()),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Table(table) => {
                Self::Map(table.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn map_get<'a>(doc: &'a Document, key: &str) -> Option<&'a Document> {
        match doc {
            Document::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    #[test]
    fn test_decode_json() {
        let doc = decode_str(r#"{"a": [1, 2.5, true, null, "x"]}"#, DocumentFormat::Json).unwrap();
        assert_eq!(
            map_get(&doc, "a"),
            Some(&Document::Sequence(vec![
                Document::Integer(1),
                Document::Float(2.5),
                Document::Bool(true),
                Document::Null,
                Document::String("x".to_string()),
            ]))
        );
    }

    #[test]
    fn test_decode_yaml_with_tags_and_numeric_keys() {
        let doc = decode_str("base: !Ref common.yaml\n8080: web\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(
            map_get(&doc, "base").and_then(Document::as_str),
            Some("common.yaml")
        );
        assert_eq!(map_get(&doc, "8080").and_then(Document::as_str), Some("web"));
    }

    #[test]
    fn test_decode_yaml_repeated_key_keeps_last_value() {
        let doc = decode_str("a: x/1.yaml\nb: 2\na: y/2.yaml\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(
            doc,
            Document::Map(vec![
                ("a".to_string(), Document::String("y/2.yaml".to_string())),
                ("b".to_string(), Document::Integer(2)),
            ])
        );
    }

    #[test]
    fn test_decode_yaml_tagged_sequence_and_empty_stream() {
        let doc = decode_str("ids: !GetAtt [a.yaml, b]\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(
            map_get(&doc, "ids"),
            Some(&Document::Sequence(vec![
                Document::String("a.yaml".to_string()),
                Document::String("b".to_string()),
            ]))
        );
        assert_eq!(decode_str("", DocumentFormat::Yaml).unwrap(), Document::Null);
    }

    #[test]
    fn test_decode_yaml_multi_document() {
        let doc = decode_str("a: 1\n---\nb: 2\n", DocumentFormat::Yaml).unwrap();
        match doc {
            Document::Sequence(docs) => assert_eq!(docs.len(), 2),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_toml() {
        let doc = decode_str(
            "[build]\ntemplate = \"t/base.toml\"\nwhen = 1979-05-27T07:32:00Z\n",
            DocumentFormat::Toml,
        )
        .unwrap();
        let build = map_get(&doc, "build").unwrap();
        assert_eq!(map_get(build, "template").and_then(Document::as_str), Some("t/base.toml"));
        assert!(matches!(map_get(build, "when"), Some(Document::String(_))));
    }

    #[test]
    fn test_sniff_falls_back_to_yaml() {
        let doc = decode_str("key: value\n", DocumentFormat::Sniff).unwrap();
        assert_eq!(map_get(&doc, "key").and_then(Document::as_str), Some("value"));
        let doc = decode_str("{\"key\": 1}", DocumentFormat::Sniff).unwrap();
        assert_eq!(map_get(&doc, "key"), Some(&Document::Integer(1)));
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(matches!(
            decode_str("{not json", DocumentFormat::Json),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            decode_str("a = [", DocumentFormat::Toml),
            Err(DecodeError::Toml(_))
        ));
        assert!(matches!(
            decode_str("a: [1, 2", DocumentFormat::Yaml),
            Err(DecodeError::Yaml(_))
        ));
    }

    #[test]
    fn test_decode_file_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();
        assert!(matches!(decode_file(&path), Err(DecodeError::Encoding)));
    }

    #[test]
    fn test_decode_file_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.json");
        fs::write(&path, "\u{feff}{\"a\": \"b\"}").unwrap();
        let doc = decode_file(&path).unwrap();
        assert_eq!(map_get(&doc, "a").and_then(Document::as_str), Some("b"));
    }
}
