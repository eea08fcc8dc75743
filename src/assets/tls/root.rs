//! Self-signed root CA asset

use crate::domain::entities::State;
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::AssetResult;

use super::{cert_key_state, configs, load_cert_key, self_signed_ca, ROOT_CA};

/// Self-signed root of the signing forest
#[derive(Debug, Clone, Copy, Default)]
pub struct RootCa;

impl Asset for RootCa {
    fn name(&self) -> &str {
        "Root CA"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn generate(&self, _parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let pem = self_signed_ca(&configs::root_ca())?;
        tracing::debug!("issued root CA");
        Ok(Generated::State(cert_key_state(ROOT_CA, pem)))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(load_cert_key(on_disk, ROOT_CA))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_key_then_cert_under_tls() {
        let Generated::State(state) = RootCa.generate(&Parents::new(), &OnDiskFiles::new()).unwrap()
        else {
            panic!("expected a state");
        };

        let names: Vec<_> = state.contents().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["tls/root-ca.key", "tls/root-ca.crt"]);
    }

    #[test]
    fn load_needs_both_files() {
        let half = OnDiskFiles::new().with_file("tls/root-ca.crt", "crt");
        assert!(RootCa.load(&half).unwrap().is_none());

        let both = half.with_file("tls/root-ca.key", "key");
        let state = RootCa.load(&both).unwrap().unwrap();
        assert_eq!(state.contents()[0].data, b"key");
        assert_eq!(state.contents()[1].data, b"crt");
    }
}
