//! FileInfo - Directory Listing Wire Types
//!
//! Requests and responses exchanged with the backing service.

use serde::{Deserialize, Deserializer, Serialize};

/// Request for the full listing of one directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Directory path; the service falls back to its root when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional child key resolved against `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ListRequest {
    /// Request the listing of `path`
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            key: None,
        }
    }

    /// Request the listing of the child `key` inside `path`
    pub fn child(path: Option<String>, key: impl Into<String>) -> Self {
        Self {
            path,
            key: Some(key.into()),
        }
    }
}

/// Request for the raw content of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub key: String,
}

/// Listing of one directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Normalized directory path
    pub path: String,
    /// Display name of the directory
    #[serde(default)]
    pub name: String,
    /// Entries of the directory
    #[serde(default)]
    pub files: Vec<FileInfo>,
}

/// Request envelope posted to the backing service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    List(ListRequest),
    Read(ReadRequest),
}

/// Response envelope returned by the backing service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    List(ListResponse),
}

/// One entry of a directory listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Unique within its directory; paths are keys joined with "/"
    pub key: String,
    #[serde(default)]
    pub is_directory: bool,
    /// Icon identifier, resolved against the service's icon endpoint
    #[serde(default)]
    pub icon: String,
    /// Icon shown while `icon` is loading
    #[serde(default)]
    pub icon_alt: Option<String>,
    #[serde(default)]
    pub icon_type: String,
    /// Name shown to the user
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub extension: String,
    /// Size in bytes; absent when the service sent something unusable
    #[serde(default, deserialize_with = "lenient_number")]
    pub size: Option<f64>,
    /// Milliseconds since the Unix epoch
    #[serde(default, deserialize_with = "lenient_number")]
    pub date: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attributes: String,
    #[serde(default)]
    pub is_active: bool,
}

impl FileInfo {
    /// Create a file entry
    pub fn file(name: impl Into<String>, extension: impl Into<String>) -> Self {
        let name = name.into();
        let extension = extension.into();
        let key = if extension.is_empty() {
            name.clone()
        } else {
            format!("{name}.{extension}")
        };
        Self {
            key,
            icon: "file".to_string(),
            name,
            extension,
            size: Some(0.0),
            ..Default::default()
        }
    }

    /// Create a directory entry
    pub fn directory(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: format!("{name}/"),
            is_directory: true,
            icon: "folder".to_string(),
            name,
            ..Default::default()
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_request_envelope() {
        let body = serde_json::to_value(Request::List(ListRequest::child(
            Some("/home".to_string()),
            "user/",
        )))
        .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({ "list": { "path": "/home", "key": "user/" } })
        );

        let empty = serde_json::to_value(Request::List(ListRequest::default())).expect("serialize");
        assert_eq!(empty, serde_json::json!({ "list": {} }));
    }

    #[test]
    fn test_list_response_decoding() {
        let json = r#"{
            "list": {
                "path": "/tmp",
                "name": "tmp",
                "files": [
                    {"key": "../", "isDirectory": true, "icon": "folder", "iconType": "file",
                     "name": "..", "extension": "", "size": 4096, "date": 0,
                     "attributes": 0, "isActive": false},
                    {"key": "a.txt", "isDirectory": false, "icon": "file?path=%2Ftmp%2Fa.txt",
                     "iconAlt": "file", "iconType": "file", "name": "a", "extension": "txt",
                     "size": "12", "date": "oops", "attributes": "rw", "isActive": true}
                ]
            }
        }"#;
        let Response::List(listing) = serde_json::from_str::<Response>(json).expect("decode");
        assert_eq!(listing.path, "/tmp");
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.files[0].attributes, "0");
        assert_eq!(listing.files[0].date, Some(0.0));
        assert_eq!(listing.files[1].size, Some(12.0));
        assert_eq!(listing.files[1].date, None);
        assert_eq!(listing.files[1].icon_alt.as_deref(), Some("file"));
        assert!(listing.files[1].is_active);
    }

    #[test]
    fn test_missing_fields_default() {
        let info: FileInfo = serde_json::from_str(r#"{"key": "x"}"#).expect("decode");
        assert_eq!(info.name, "");
        assert_eq!(info.size, None);
        assert!(!info.is_directory);
    }
}
