//! Install configuration document
//!
//! Serialized as `install-config.yml`. Every downstream asset that needs
//! cluster-wide facts (names, networks, platform) reads them from here.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entities::State;
use crate::error::{AssetError, AssetResult};

use super::INSTALL_CONFIG_FILENAME;

/// Default pod network
pub const DEFAULT_POD_CIDR: &str = "10.2.0.0/16";
/// Default service network
pub const DEFAULT_SERVICE_CIDR: &str = "10.3.0.0/16";
/// Replica count for the default machine pools
pub const DEFAULT_REPLICAS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    pub metadata: ObjectMeta,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    pub admin: Admin,
    pub base_domain: String,
    pub networking: Networking,
    pub machines: Vec<MachinePool>,
    pub platform: Platform,
    pub pull_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networking {
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    #[serde(rename = "serviceCIDR")]
    pub service_cidr: Ipv4Cidr,
    #[serde(rename = "podCIDR")]
    pub pod_cidr: Ipv4Cidr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Flannel,
    Calico,
    Canal,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
}

/// Target platform; exactly one field is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libvirt: Option<LibvirtPlatform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsPlatform {
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtPlatform {
    #[serde(rename = "URI")]
    pub uri: String,
}

impl Platform {
    pub fn aws(region: impl Into<String>) -> Self {
        Self {
            aws: Some(AwsPlatform {
                region: region.into(),
            }),
            libvirt: None,
        }
    }

    pub fn libvirt(uri: impl Into<String>) -> Self {
        Self {
            aws: None,
            libvirt: Some(LibvirtPlatform { uri: uri.into() }),
        }
    }

    /// Short platform name, also the template subdirectory name
    pub fn name(&self) -> &'static str {
        if self.aws.is_some() {
            "aws"
        } else if self.libvirt.is_some() {
            "libvirt"
        } else {
            "none"
        }
    }
}

impl Networking {
    pub fn with_defaults() -> AssetResult<Self> {
        Ok(Self {
            network_type: NetworkType::Flannel,
            service_cidr: DEFAULT_SERVICE_CIDR.parse()?,
            pod_cidr: DEFAULT_POD_CIDR.parse()?,
        })
    }
}

impl InstallConfig {
    /// Parse the config out of the install-config asset's state.
    pub fn from_state(state: &State) -> AssetResult<Self> {
        let content = state
            .find_by_filename(INSTALL_CONFIG_FILENAME)
            .ok_or_else(|| AssetError::MissingContent {
                asset: "Install Config".to_string(),
                filename: INSTALL_CONFIG_FILENAME.to_string(),
            })?;
        Self::from_yaml(&content.data)
    }

    pub fn from_yaml(data: &[u8]) -> AssetResult<Self> {
        serde_yaml_ng::from_slice(data).map_err(|source| AssetError::Yaml {
            what: INSTALL_CONFIG_FILENAME.to_string(),
            source,
        })
    }

    pub fn to_yaml(&self) -> AssetResult<String> {
        serde_yaml_ng::to_string(self).map_err(|source| AssetError::Yaml {
            what: INSTALL_CONFIG_FILENAME.to_string(),
            source,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// `<name>.<baseDomain>`
    pub fn base_address(&self) -> String {
        format!("{}.{}", self.metadata.name, self.base_domain)
    }

    /// Replica count of the `master` pool (1 when unset or absent)
    pub fn master_count(&self) -> u32 {
        self.machines
            .iter()
            .find(|m| m.name == "master")
            .and_then(|m| m.replicas)
            .unwrap_or(1)
    }

    /// Cluster DNS service address: the 10th host of the service network
    pub fn cluster_dns_ip(&self) -> AssetResult<Ipv4Addr> {
        self.networking.service_cidr.host(10)
    }

    /// Kubernetes API service address: the 1st host of the service network
    pub fn api_server_ip(&self) -> AssetResult<Ipv4Addr> {
        self.networking.service_cidr.host(1)
    }
}

/// IPv4 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    pub fn new(addr: Ipv4Addr, prefix: u8) -> AssetResult<Self> {
        if prefix > 32 {
            return Err(AssetError::Config(format!(
                "prefix length {prefix} is out of range"
            )));
        }
        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & Self::mask(prefix)),
            prefix,
        })
    }

    fn mask(prefix: u8) -> u32 {
        u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The `n`th address of the network; 0 is the network address itself.
    pub fn host(&self, n: u32) -> AssetResult<Ipv4Addr> {
        let size = 1u64 << (32 - u32::from(self.prefix));
        if u64::from(n) >= size {
            return Err(AssetError::Config(format!(
                "host number {n} does not fit in {self}"
            )));
        }
        Ok(Ipv4Addr::from(u32::from(self.network) + n))
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AssetError::Config(format!("{s:?} is not an IPv4 CIDR"));
        let (addr, prefix) = s.split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        Self::new(addr, prefix)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv4Cidr> for String {
    fn from(cidr: Ipv4Cidr) -> Self {
        cidr.to_string()
    }
}

/// Fully populated config for tests
#[cfg(test)]
pub(crate) fn sample() -> InstallConfig {
    InstallConfig {
        metadata: ObjectMeta {
            name: "test-cluster".to_string(),
        },
        cluster_id: "00000000-0000-4000-8000-000000000000".to_string(),
        admin: Admin {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
            ssh_key: "ssh-ed25519 AAAA".to_string(),
        },
        base_domain: "example.com".to_string(),
        networking: Networking::with_defaults().unwrap(),
        machines: vec![
            MachinePool {
                name: "master".to_string(),
                replicas: Some(3),
            },
            MachinePool {
                name: "worker".to_string(),
                replicas: Some(3),
            },
        ],
        platform: Platform::aws("us-east-1"),
        pull_secret: "{}".to_string(),
    }
}
