//! Ignition v2.2 document types (the subset the bootstrap config uses)

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

pub const IGNITION_VERSION: &str = "2.2.0";

const DATA_URL_PREFIX: &str = "data:text/plain;charset=utf-8;base64,";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub ignition: Ignition,
    pub storage: Storage,
    pub systemd: Systemd,
    pub passwd: Passwd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ignition {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub files: Vec<File>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub filesystem: String,
    pub path: String,
    pub mode: u32,
    pub contents: FileContents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Systemd {
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passwd {
    pub users: Vec<PasswdUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswdUser {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            ignition: Ignition {
                version: IGNITION_VERSION.to_string(),
            },
            storage: Storage::default(),
            systemd: Systemd::default(),
            passwd: Passwd::default(),
        }
    }

    pub fn file(&self, path: &str) -> Option<&File> {
        self.storage.files.iter().find(|f| f.path == path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl File {
    /// File on the root filesystem with inline base64 contents
    pub fn from_bytes(path: impl Into<String>, mode: u32, data: &[u8]) -> Self {
        Self {
            filesystem: "root".to_string(),
            path: path.into(),
            mode,
            contents: FileContents {
                source: format!("{DATA_URL_PREFIX}{}", STANDARD.encode(data)),
            },
        }
    }

    /// Inline contents, if the source is one of our data URLs
    pub fn data(&self) -> Option<Vec<u8>> {
        let encoded = self.contents.source.strip_prefix(DATA_URL_PREFIX)?;
        STANDARD.decode(encoded).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_contents_are_data_urls() {
        let file = File::from_bytes("/etc/motd", 0o644, b"hello");
        assert_eq!(
            file.contents.source,
            "data:text/plain;charset=utf-8;base64,aGVsbG8="
        );
        assert_eq!(file.data().unwrap(), b"hello");
    }

    #[test]
    fn json_shape() {
        let mut config = Config::new();
        config.passwd.users.push(PasswdUser {
            name: "core".to_string(),
            ssh_authorized_keys: vec!["ssh-ed25519 AAAA".to_string()],
        });
        config.systemd.units.push(Unit {
            name: "a.service".to_string(),
            contents: String::new(),
            enabled: None,
        });

        let json: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(json["ignition"]["version"], "2.2.0");
        assert_eq!(json["passwd"]["users"][0]["sshAuthorizedKeys"][0], "ssh-ed25519 AAAA");
        assert!(json["systemd"]["units"][0].get("enabled").is_none());
    }
}
