//! Certificate and key generation
//!
//! Keys are ECDSA P-256. Every certificate carries a subject key identifier
//! derived from its own public key, so chained certificates reference their
//! signer through the authority key identifier.

use std::net::IpAddr;

use rand::Rng;
use rcgen::{
    string::Ia5String, BasicConstraints, CertificateParams, CertificateSigningRequestParams,
    DistinguishedName, DnType, DnValue, ExtendedKeyUsagePurpose, IsCa, Issuer, KeyIdMethod,
    KeyPair, KeyUsagePurpose, PublicKeyData, SanType, SerialNumber,
};
use sha1::{Digest, Sha1};
use ::time::{Duration, OffsetDateTime};
use x509_parser::prelude::*;

use super::error::PkiError;

/// Ten years, for CAs and long-lived serving certs
pub const VALIDITY_TEN_YEARS: Duration = Duration::days(365 * 10);

/// Thirty minutes, for bootstrap-only client certs
pub const VALIDITY_THIRTY_MINUTES: Duration = Duration::minutes(30);

type Result<T> = std::result::Result<T, PkiError>;

/// Certificate subject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub common_name: String,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
}

impl Subject {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn organizational_unit(mut self, unit: impl Into<String>) -> Self {
        self.organizational_unit = Some(unit.into());
        self
    }

    fn distinguished_name(&self) -> DistinguishedName {
        let mut dn = DistinguishedName::new();
        dn.push(
            DnType::CommonName,
            DnValue::Utf8String(self.common_name.clone()),
        );
        if let Some(o) = &self.organization {
            dn.push(DnType::OrganizationName, DnValue::Utf8String(o.clone()));
        }
        if let Some(ou) = &self.organizational_unit {
            dn.push(
                DnType::OrganizationalUnitName,
                DnValue::Utf8String(ou.clone()),
            );
        }
        dn
    }
}

/// Everything needed to issue one key pair and certificate
#[derive(Debug, Clone)]
pub struct CertCfg {
    pub subject: Subject,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub key_usages: Vec<KeyUsagePurpose>,
    pub ext_key_usages: Vec<ExtendedKeyUsagePurpose>,
    pub validity: Duration,
    pub is_ca: bool,
}

impl CertCfg {
    /// CA defaults: cert signing, ten years
    pub fn ca(subject: Subject) -> Self {
        Self {
            subject,
            dns_names: Vec::new(),
            ip_addresses: Vec::new(),
            key_usages: vec![
                KeyUsagePurpose::KeyEncipherment,
                KeyUsagePurpose::DigitalSignature,
                KeyUsagePurpose::KeyCertSign,
            ],
            ext_key_usages: Vec::new(),
            validity: VALIDITY_TEN_YEARS,
            is_ca: true,
        }
    }

    /// Leaf defaults: key encipherment and signatures, ten years
    pub fn leaf(subject: Subject, ext_key_usages: Vec<ExtendedKeyUsagePurpose>) -> Self {
        Self {
            subject,
            dns_names: Vec::new(),
            ip_addresses: Vec::new(),
            key_usages: vec![
                KeyUsagePurpose::KeyEncipherment,
                KeyUsagePurpose::DigitalSignature,
            ],
            ext_key_usages,
            validity: VALIDITY_TEN_YEARS,
            is_ca: false,
        }
    }

    pub fn with_dns_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dns_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ip_addresses(mut self, ips: impl IntoIterator<Item = IpAddr>) -> Self {
        self.ip_addresses = ips.into_iter().collect();
        self
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    fn subject_alt_names(&self) -> Result<Vec<SanType>> {
        let dns = self.dns_names.iter().map(|name| {
            Ia5String::try_from(name.clone())
                .map(SanType::DnsName)
                .map_err(|e| {
                    PkiError::CertificateGeneration(format!("invalid DNS name '{name}': {e}"))
                })
        });
        let ips = self.ip_addresses.iter().map(|ip| Ok(SanType::IpAddress(*ip)));
        dns.chain(ips).collect()
    }

    fn basic_constraints(&self) -> IsCa {
        if self.is_ca {
            IsCa::Ca(BasicConstraints::Unconstrained)
        } else {
            IsCa::ExplicitNoCa
        }
    }
}

/// PEM-encoded private key and certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertKeyPem {
    pub key_pem: String,
    pub cert_pem: String,
}

pub fn generate_private_key() -> Result<KeyPair> {
    KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)
        .map_err(|e| PkiError::KeyGeneration(e.to_string()))
}

/// SHA-1 over the subject public key bits (the EC point encoding).
pub fn subject_key_id(key: &KeyPair) -> Result<Vec<u8>> {
    let spki_der = key.subject_public_key_info();
    let (_, spki) = SubjectPublicKeyInfo::from_der(&spki_der)
        .map_err(|e| PkiError::Parse(format!("failed to parse public key: {e}")))?;
    Ok(Sha1::digest(&spki.subject_public_key.data).to_vec())
}

/// Random serial in `[0, i64::MAX)`
fn serial_number() -> SerialNumber {
    let serial = rand::rng().random_range(0..i64::MAX as u64);
    SerialNumber::from_slice(&serial.to_be_bytes())
}

/// Parse the first certificate in a PEM blob
fn parse_pem(cert_pem: &str) -> Result<::pem::Pem> {
    ::pem::parse(cert_pem.as_bytes())
        .map_err(|e| PkiError::Parse(format!("failed to parse PEM: {e}")))
}

/// `notBefore` of a PEM certificate
pub fn not_before(cert_pem: &str) -> Result<OffsetDateTime> {
    let pem = parse_pem(cert_pem)?;
    let (_, cert) = X509Certificate::from_der(pem.contents())
        .map_err(|e| PkiError::Parse(format!("failed to parse certificate: {e}")))?;
    OffsetDateTime::from_unix_timestamp(cert.validity().not_before.timestamp())
        .map_err(|e| PkiError::Parse(format!("certificate notBefore out of range: {e}")))
}

/// Issue a self-signed CA.
///
/// The subject must carry both a common name and an organizational unit;
/// this is checked before any key material is generated.
pub fn self_signed_ca(cfg: &CertCfg) -> Result<CertKeyPem> {
    let has_ou = matches!(cfg.subject.organizational_unit.as_deref(), Some(ou) if !ou.is_empty());
    if cfg.subject.common_name.is_empty() || !has_ou {
        return Err(PkiError::InvalidSubject(
            "root CA needs both CN and OU".to_string(),
        ));
    }

    let key = generate_private_key()?;
    let now = OffsetDateTime::now_utc();

    let mut params = CertificateParams::default();
    params.distinguished_name = cfg.subject.distinguished_name();
    params.subject_alt_names = cfg.subject_alt_names()?;
    params.is_ca = cfg.basic_constraints();
    params.key_usages = cfg.key_usages.clone();
    params.extended_key_usages = cfg.ext_key_usages.clone();
    params.serial_number = Some(serial_number());
    params.not_before = now;
    params.not_after = now + cfg.validity;
    params.key_identifier_method = KeyIdMethod::PreSpecified(subject_key_id(&key)?);

    let cert = params
        .self_signed(&key)
        .map_err(|e| PkiError::CertificateGeneration(format!("failed to self-sign: {e}")))?;

    Ok(CertKeyPem {
        key_pem: key.serialize_pem(),
        cert_pem: cert.pem(),
    })
}

/// Issue a key pair and certificate signed by `signer`.
///
/// Goes through a CSR carrying the subject and SANs; usages, validity and
/// identifiers are set by the signer side. `notBefore` is inherited from
/// the signer's certificate.
pub fn signed_cert(cfg: &CertCfg, signer: &CertKeyPem) -> Result<CertKeyPem> {
    let key = generate_private_key()?;

    let mut request = CertificateParams::default();
    request.distinguished_name = cfg.subject.distinguished_name();
    request.subject_alt_names = cfg.subject_alt_names()?;
    let csr_pem = request
        .serialize_request(&key)
        .and_then(|csr| csr.pem())
        .map_err(|e| PkiError::CertificateGeneration(format!("failed to create CSR: {e}")))?;

    let mut csr = CertificateSigningRequestParams::from_pem(&csr_pem)
        .map_err(|e| PkiError::Parse(format!("failed to parse CSR: {e}")))?;
    csr.params.is_ca = cfg.basic_constraints();
    csr.params.key_usages = cfg.key_usages.clone();
    csr.params.extended_key_usages = cfg.ext_key_usages.clone();
    csr.params.serial_number = Some(serial_number());
    csr.params.not_before = not_before(&signer.cert_pem)?;
    csr.params.not_after = OffsetDateTime::now_utc() + cfg.validity;
    csr.params.key_identifier_method = KeyIdMethod::PreSpecified(subject_key_id(&key)?);
    csr.params.use_authority_key_identifier_extension = true;

    let signer_key = KeyPair::from_pem(&signer.key_pem)
        .map_err(|e| PkiError::Signer(format!("failed to load signer key: {e}")))?;
    let issuer = Issuer::from_ca_cert_pem(&signer.cert_pem, &signer_key)
        .map_err(|e| PkiError::Signer(format!("failed to load signer certificate: {e}")))?;

    let cert = csr
        .signed_by(&issuer)
        .map_err(|e| PkiError::CertificateGeneration(format!("failed to sign: {e}")))?;

    Ok(CertKeyPem {
        key_pem: key.serialize_pem(),
        cert_pem: cert.pem(),
    })
}
