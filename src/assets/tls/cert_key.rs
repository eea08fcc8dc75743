//! Generic key and certificate asset signed by a parent CA

use crate::assets::installconfig::{install_config_of, InstallConfig};
use crate::domain::entities::State;
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::AssetResult;

use super::{cert_key_of, cert_key_state, load_cert_key, signed_cert, CertCfg};

/// Derives a certificate's configuration from the install config
pub type CfgBuilder = fn(&InstallConfig) -> AssetResult<CertCfg>;

/// Certificate and key signed by another PKI asset
pub struct CertKey {
    name: String,
    base: String,
    signer: AssetId,
    signer_base: String,
    install_config: AssetId,
    cfg: CfgBuilder,
}

impl CertKey {
    pub fn new(
        name: impl Into<String>,
        base: impl Into<String>,
        signer: AssetId,
        signer_base: impl Into<String>,
        install_config: AssetId,
        cfg: CfgBuilder,
    ) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            signer,
            signer_base: signer_base.into(),
            install_config,
            cfg,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Asset for CertKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![self.signer, self.install_config]
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let config = install_config_of(parents, self.install_config)?;
        let cfg = (self.cfg)(&config)?;
        let signer = cert_key_of(parents, self.signer, &self.signer_base)?;

        let pem = signed_cert(&cfg, &signer)?;
        tracing::debug!(cert = %self.base, signer = %self.signer_base, "issued certificate");
        Ok(Generated::State(cert_key_state(&self.base, pem)))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(load_cert_key(on_disk, &self.base))
    }
}
