use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::AssetResult;

use super::{generate_private_key, key_filename, tls_path};

/// Bare key pair with no certificate: private key plus public key PEM
pub struct KeyPairAsset {
    name: String,
    base: String,
}

impl KeyPairAsset {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }

    fn paths(&self) -> [String; 2] {
        [
            tls_path(&key_filename(&self.base)),
            tls_path(&format!("{}.pub", self.base)),
        ]
    }
}

impl Asset for KeyPairAsset {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn generate(&self, _parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let key = generate_private_key()?;
        let [private, public] = self.paths();
        Ok(Generated::State(
            State::new()
                .with_content(Content::new(private, key.serialize_pem()))
                .with_content(Content::new(public, key.public_key_pem())),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        let [private, public] = self.paths();
        Ok(on_disk.load_exact(&[&private, &public]))
    }
}
