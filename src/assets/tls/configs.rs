//! Certificate configurations for the stock PKI assets

use std::net::{IpAddr, Ipv4Addr};

use rcgen::ExtendedKeyUsagePurpose::{ClientAuth, ServerAuth};

use crate::assets::installconfig::InstallConfig;
use crate::error::AssetResult;

use super::{CertCfg, Subject, VALIDITY_THIRTY_MINUTES};

pub fn root_ca() -> CertCfg {
    CertCfg::ca(Subject::new("root-ca").organizational_unit("openshift"))
}

pub fn kube_ca(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::ca(
        Subject::new("kube-ca").organizational_unit("bootkube"),
    ))
}

pub fn etcd_ca(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::ca(Subject::new("etcd").organizational_unit("etcd")))
}

pub fn aggregator_ca(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::ca(
        Subject::new("aggregator").organizational_unit("bootkube"),
    ))
}

pub fn service_serving_ca(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::ca(
        Subject::new("service-serving").organizational_unit("bootkube"),
    ))
}

pub fn admin(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("system:admin").organization("system:masters"),
        vec![ClientAuth],
    ))
}

fn api_dns_name(config: &InstallConfig) -> String {
    format!("{}-api.{}", config.name(), config.base_domain)
}

pub fn api_server(config: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("system:kube-apiserver").organization("kube-master"),
        vec![ServerAuth, ClientAuth],
    )
    .with_dns_names([
        api_dns_name(config),
        "kubernetes".to_string(),
        "kubernetes.default".to_string(),
        "kubernetes.default.svc".to_string(),
        "kubernetes.default.svc.cluster.local".to_string(),
    ])
    .with_ip_addresses([IpAddr::V4(config.api_server_ip()?)]))
}

pub fn openshift_api_server(config: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("openshift-apiserver").organization("kube-master"),
        vec![ServerAuth, ClientAuth],
    )
    .with_dns_names([
        api_dns_name(config),
        "openshift-apiserver".to_string(),
        "openshift-apiserver.kube-system".to_string(),
        "openshift-apiserver.kube-system.svc".to_string(),
        "openshift-apiserver.kube-system.svc.cluster.local".to_string(),
        "localhost".to_string(),
    ])
    .with_ip_addresses([
        IpAddr::V4(config.api_server_ip()?),
        IpAddr::V4(Ipv4Addr::LOCALHOST),
    ]))
}

pub fn api_server_proxy(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("kube-apiserver-proxy").organization("kube-master"),
        vec![ClientAuth],
    ))
}

/// Bootstrap-only credential, replaced once the kubelet joins
pub fn kubelet(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("system:serviceaccount:kube-system:default")
            .organization("system:serviceaccounts:kube-system"),
        vec![ClientAuth],
    )
    .with_validity(VALIDITY_THIRTY_MINUTES))
}

pub fn etcd_client(_: &InstallConfig) -> AssetResult<CertCfg> {
    Ok(CertCfg::leaf(
        Subject::new("etcd").organization("etcd"),
        vec![ServerAuth, ClientAuth],
    ))
}

pub fn ingress(config: &InstallConfig) -> AssetResult<CertCfg> {
    let base = config.base_address();
    Ok(CertCfg::leaf(
        Subject::new(base.clone()).organization("ingress"),
        vec![ServerAuth],
    )
    .with_dns_names([base.clone(), format!("*.{base}")]))
}

pub fn machine_config_server(config: &InstallConfig) -> AssetResult<CertCfg> {
    let host = format!("{}-tnc.{}", config.name(), config.base_domain);
    Ok(CertCfg::leaf(Subject::new(host.clone()), vec![ServerAuth]).with_dns_names([host]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::installconfig::types::sample;

    #[test]
    fn api_server_names_and_address() {
        let cfg = api_server(&sample()).unwrap();
        assert_eq!(cfg.dns_names[0], "test-cluster-api.example.com");
        assert_eq!(cfg.ip_addresses, vec![IpAddr::V4(Ipv4Addr::new(10, 3, 0, 1))]);
        assert!(!cfg.is_ca);
    }

    #[test]
    fn ingress_covers_wildcard() {
        let cfg = ingress(&sample()).unwrap();
        assert_eq!(
            cfg.dns_names,
            vec!["test-cluster.example.com", "*.test-cluster.example.com"]
        );
    }

    #[test]
    fn kubelet_is_short_lived() {
        assert_eq!(kubelet(&sample()).unwrap().validity, VALIDITY_THIRTY_MINUTES);
    }

    #[test]
    fn cas_have_cn_and_ou() {
        let config = sample();
        for cfg in [
            root_ca(),
            kube_ca(&config).unwrap(),
            etcd_ca(&config).unwrap(),
            aggregator_ca(&config).unwrap(),
            service_serving_ca(&config).unwrap(),
        ] {
            assert!(cfg.is_ca);
            assert!(!cfg.subject.common_name.is_empty());
            assert!(cfg.subject.organizational_unit.is_some());
        }
    }
}
