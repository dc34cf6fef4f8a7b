//! Default settings schema.
//!
//! The schema is a constant table. Every call to [`default_settings`] builds a
//! new map from it, so callers can mutate what they get back freely.

use serde_json::{json, Map, Value};

pub type SettingsMap = Map<String, Value>;

/// Default value of a single schema entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaDefault {
    EmptyObject,
    Null,
    Bool(bool),
    Int(i64),
    Str(&'static str),
    /// Filled from the user agent the store was built with.
    UserAgent,
}

impl SchemaDefault {
    pub fn to_value(self, user_agent: &str) -> Value {
        match self {
            SchemaDefault::EmptyObject => json!({}),
            SchemaDefault::Null => Value::Null,
            SchemaDefault::Bool(b) => Value::Bool(b),
            SchemaDefault::Int(n) => Value::from(n),
            SchemaDefault::Str(s) => Value::from(s),
            SchemaDefault::UserAgent => Value::from(user_agent),
        }
    }
}

pub const DEFAULT_SCHEMA: &[(&str, SchemaDefault)] = &[
    ("mapping_data", SchemaDefault::EmptyObject),
    ("work_path", SchemaDefault::Str("")),
    ("folder_name", SchemaDefault::Str("Download")),
    ("name_format", SchemaDefault::Str("发布时间 作者昵称 作品标题")),
    ("user_agent", SchemaDefault::UserAgent),
    ("cookie", SchemaDefault::Str("")),
    ("proxy", SchemaDefault::Null),
    ("timeout", SchemaDefault::Int(10)),
    ("chunk", SchemaDefault::Int(1024 * 1024 * 2)),
    ("max_retry", SchemaDefault::Int(5)),
    ("record_data", SchemaDefault::Bool(false)),
    ("image_format", SchemaDefault::Str("JPEG")),
    ("image_download", SchemaDefault::Bool(true)),
    ("video_download", SchemaDefault::Bool(true)),
    ("live_download", SchemaDefault::Bool(true)),
    ("folder_mode", SchemaDefault::Bool(true)),
    ("download_record", SchemaDefault::Bool(true)),
    ("author_archive", SchemaDefault::Bool(true)),
    ("write_mtime", SchemaDefault::Bool(false)),
    ("download_desc", SchemaDefault::Bool(true)),
    ("language", SchemaDefault::Str("zh_CN")),
    ("script_server", SchemaDefault::Bool(false)),
];

/// Build a fresh default settings map in schema order.
pub fn default_settings(user_agent: &str) -> SettingsMap {
    DEFAULT_SCHEMA
        .iter()
        .map(|(key, default)| (key.to_string(), default.to_value(user_agent)))
        .collect()
}

pub fn schema_keys() -> impl Iterator<Item = &'static str> {
    DEFAULT_SCHEMA.iter().map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_keys_are_unique() {
        let keys: HashSet<&str> = schema_keys().collect();
        assert_eq!(keys.len(), DEFAULT_SCHEMA.len());
    }

    #[test]
    fn test_default_settings_keeps_schema_order() {
        let defaults = default_settings("ua");
        let keys: Vec<&str> = defaults.keys().map(String::as_str).collect();
        let expected: Vec<&str> = schema_keys().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_default_settings_values() {
        let defaults = default_settings("Mozilla/5.0 test");
        assert_eq!(defaults["mapping_data"], json!({}));
        assert_eq!(defaults["folder_name"], "Download");
        assert_eq!(defaults["user_agent"], "Mozilla/5.0 test");
        assert_eq!(defaults["proxy"], Value::Null);
        assert_eq!(defaults["timeout"], 10);
        assert_eq!(defaults["chunk"], 2_097_152);
        assert_eq!(defaults["max_retry"], 5);
        assert_eq!(defaults["record_data"], false);
        assert_eq!(defaults["image_format"], "JPEG");
        assert_eq!(defaults["language"], "zh_CN");
        assert_eq!(defaults["script_server"], false);
    }

    #[test]
    fn test_default_settings_are_independent_copies() {
        // Arrange
        let mut first = default_settings("ua");

        // Act
        first
            .get_mut("mapping_data")
            .and_then(Value::as_object_mut)
            .unwrap()
            .insert("12345".into(), json!("alias"));
        first.insert("timeout".into(), json!(99));
        let second = default_settings("ua");

        // Assert
        assert_eq!(second["mapping_data"], json!({}));
        assert_eq!(second["timeout"], 10);
    }
}
