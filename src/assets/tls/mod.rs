//! PKI family
//!
//! A self-signed root CA, intermediate CAs signed by it, and leaf
//! certificates signed by one of the CAs. Every asset here persists exactly
//! two PEM files under `tls/`.

mod cert;
mod cert_key;
pub mod configs;
mod error;
mod key_pair;
mod root;

pub use cert::{
    generate_private_key, not_before, self_signed_ca, signed_cert, subject_key_id, CertCfg,
    CertKeyPem, Subject, VALIDITY_TEN_YEARS, VALIDITY_THIRTY_MINUTES,
};
pub use cert_key::{CertKey, CfgBuilder};
pub use error::PkiError;
pub use key_pair::KeyPairAsset;
pub use root::RootCa;

use crate::domain::entities::{Content, State};
use crate::domain::ports::Parents;
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

/// Output subdirectory for all PKI material
pub const TLS_DIR: &str = "tls";

pub const ROOT_CA: &str = "root-ca";
pub const KUBE_CA: &str = "kube-ca";
pub const ETCD_CA: &str = "etcd-ca";
pub const AGGREGATOR_CA: &str = "aggregator-ca";
pub const SERVICE_SERVING_CA: &str = "service-serving-ca";
pub const ADMIN: &str = "admin";
pub const API_SERVER: &str = "apiserver";
pub const OPENSHIFT_API_SERVER: &str = "openshift-apiserver";
pub const API_SERVER_PROXY: &str = "apiserver-proxy";
pub const KUBELET: &str = "kubelet";
pub const ETCD_CLIENT: &str = "etcd-client";
pub const INGRESS: &str = "ingress";
pub const MCS: &str = "machine-config-server";
pub const SERVICE_ACCOUNT: &str = "service-account";

pub fn key_filename(base: &str) -> String {
    format!("{base}.key")
}

pub fn cert_filename(base: &str) -> String {
    format!("{base}.crt")
}

fn tls_path(filename: &str) -> String {
    format!("{TLS_DIR}/{filename}")
}

/// `[key, cert]` contents for one certificate
fn cert_key_state(base: &str, pem: CertKeyPem) -> State {
    State::new()
        .with_content(Content::new(tls_path(&key_filename(base)), pem.key_pem))
        .with_content(Content::new(tls_path(&cert_filename(base)), pem.cert_pem))
}

/// Both files of a certificate, or nothing
fn load_cert_key(on_disk: &OnDiskFiles, base: &str) -> Option<State> {
    let key = tls_path(&key_filename(base));
    let cert = tls_path(&cert_filename(base));
    on_disk.load_exact(&[&key, &cert])
}

fn pem_text<'a>(asset: &str, filename: &str, data: &'a [u8]) -> AssetResult<&'a str> {
    std::str::from_utf8(data).map_err(|_| AssetError::InvalidInput {
        asset: asset.to_string(),
        message: format!("{filename} is not valid PEM text"),
    })
}

/// Key and certificate of a signer among a consumer's parents
pub fn cert_key_of(parents: &Parents, id: AssetId, base: &str) -> AssetResult<CertKeyPem> {
    let key_file = key_filename(base);
    let cert_file = cert_filename(base);
    let key = parents.data_by_filename(id, &key_file)?;
    let cert = parents.data_by_filename(id, &cert_file)?;
    Ok(CertKeyPem {
        key_pem: pem_text(base, &key_file, key)?.to_string(),
        cert_pem: pem_text(base, &cert_file, cert)?.to_string(),
    })
}

/// Handles of every PKI asset
#[derive(Debug, Clone, Copy)]
pub struct TlsStock {
    pub root_ca: AssetId,
    pub kube_ca: AssetId,
    pub etcd_ca: AssetId,
    pub aggregator_ca: AssetId,
    pub service_serving_ca: AssetId,
    pub admin: AssetId,
    pub api_server: AssetId,
    pub openshift_api_server: AssetId,
    pub api_server_proxy: AssetId,
    pub kubelet: AssetId,
    pub etcd_client: AssetId,
    pub ingress: AssetId,
    pub mcs: AssetId,
    pub service_account: AssetId,
}

impl TlsStock {
    pub fn establish(graph: &mut AssetGraph, install_config: AssetId) -> Self {
        let root_ca = graph.add(RootCa);

        let mut signed = |name: &str, base: &str, signer: AssetId, signer_base: &str, cfg: CfgBuilder| {
            graph.add(CertKey::new(name, base, signer, signer_base, install_config, cfg))
        };

        let kube_ca = signed("Kube CA", KUBE_CA, root_ca, ROOT_CA, configs::kube_ca);
        let etcd_ca = signed("Etcd CA", ETCD_CA, root_ca, ROOT_CA, configs::etcd_ca);
        let aggregator_ca = signed(
            "Aggregator CA",
            AGGREGATOR_CA,
            root_ca,
            ROOT_CA,
            configs::aggregator_ca,
        );
        let service_serving_ca = signed(
            "Service Serving CA",
            SERVICE_SERVING_CA,
            root_ca,
            ROOT_CA,
            configs::service_serving_ca,
        );

        let admin = signed("Admin Cert", ADMIN, kube_ca, KUBE_CA, configs::admin);
        let api_server = signed(
            "API Server Cert",
            API_SERVER,
            kube_ca,
            KUBE_CA,
            configs::api_server,
        );
        let openshift_api_server = signed(
            "OpenShift API Server Cert",
            OPENSHIFT_API_SERVER,
            kube_ca,
            KUBE_CA,
            configs::openshift_api_server,
        );
        let api_server_proxy = signed(
            "API Server Proxy Cert",
            API_SERVER_PROXY,
            kube_ca,
            KUBE_CA,
            configs::api_server_proxy,
        );
        let kubelet = signed("Kubelet Cert", KUBELET, kube_ca, KUBE_CA, configs::kubelet);
        let etcd_client = signed(
            "Etcd Client Cert",
            ETCD_CLIENT,
            etcd_ca,
            ETCD_CA,
            configs::etcd_client,
        );
        let ingress = signed("Ingress Cert", INGRESS, root_ca, ROOT_CA, configs::ingress);
        let mcs = signed(
            "Machine Config Server Cert",
            MCS,
            root_ca,
            ROOT_CA,
            configs::machine_config_server,
        );

        let service_account = graph.add(KeyPairAsset::new("Service Account Key Pair", SERVICE_ACCOUNT));

        Self {
            root_ca,
            kube_ca,
            etcd_ca,
            aggregator_ca,
            service_serving_ca,
            admin,
            api_server,
            openshift_api_server,
            api_server_proxy,
            kubelet,
            etcd_client,
            ingress,
            mcs,
            service_account,
        }
    }

    /// Every PKI asset, CAs first
    pub fn all(&self) -> [AssetId; 14] {
        [
            self.root_ca,
            self.kube_ca,
            self.etcd_ca,
            self.aggregator_ca,
            self.service_serving_ca,
            self.admin,
            self.api_server,
            self.openshift_api_server,
            self.api_server_proxy,
            self.kubelet,
            self.etcd_client,
            self.ingress,
            self.mcs,
            self.service_account,
        ]
    }
}
