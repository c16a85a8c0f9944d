//! JOSE header shape accepted by the edge.
//!
//! Every registered header parameter is typed, so a token whose header
//! carries a malformed `x5c`, `jwk`, `crit` and so on is rejected before its
//! signature is checked. Unregistered parameters must be strings.

use std::collections::HashMap;

use serde::Deserialize;

/// Signing algorithms a header may name. Only `HS256` is accepted later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum Algorithm {
    HS256,
    HS384,
    HS512,
    ES256,
    ES384,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    EdDSA,
}

#[derive(Deserialize)]
#[allow(dead_code)]
pub(crate) struct JoseHeader {
    pub typ: Option<String>,
    pub alg: Algorithm,
    cty: Option<String>,
    jku: Option<String>,
    jwk: Option<Jwk>,
    kid: Option<String>,
    x5u: Option<String>,
    x5c: Option<Vec<String>>,
    x5t: Option<String>,
    #[serde(rename = "x5t#S256")]
    x5t_s256: Option<String>,
    crit: Option<Vec<String>>,
    enc: Option<String>,
    zip: Option<String>,
    url: Option<String>,
    nonce: Option<String>,
    #[serde(flatten)]
    extras: HashMap<String, String>,
}

impl JoseHeader {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Jwk {
    #[serde(flatten)]
    common: JwkCommon,
    #[serde(flatten)]
    key: JwkKey,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct JwkCommon {
    #[serde(rename = "use", default)]
    public_key_use: Option<String>,
    #[serde(rename = "key_ops", default)]
    key_operations: Option<Vec<String>>,
    #[serde(rename = "alg", default)]
    key_algorithm: Option<KeyAlgorithm>,
    #[serde(rename = "kid", default)]
    key_id: Option<String>,
    #[serde(rename = "x5u")]
    x509_url: Option<String>,
    #[serde(rename = "x5c")]
    x509_chain: Option<Vec<String>>,
    #[serde(rename = "x5t")]
    x509_sha1_fingerprint: Option<String>,
    #[serde(rename = "x5t#S256")]
    x509_sha256_fingerprint: Option<String>,
}

#[derive(Deserialize)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms, dead_code)]
enum KeyAlgorithm {
    HS256,
    HS384,
    HS512,
    ES256,
    ES384,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    EdDSA,
    RSA1_5,
    #[serde(rename = "RSA-OAEP")]
    RSA_OAEP,
    #[serde(rename = "RSA-OAEP-256")]
    RSA_OAEP_256,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum JwkKey {
    EllipticCurve {
        kty: EcKty,
        crv: Curve,
        x: String,
        y: String,
    },
    Rsa {
        kty: RsaKty,
        n: String,
        e: String,
    },
    Octet {
        kty: OctKty,
        k: String,
    },
    OctetPair {
        kty: OkpKty,
        crv: Curve,
        x: String,
    },
}

#[derive(Deserialize)]
#[allow(clippy::upper_case_acronyms)]
enum EcKty {
    EC,
}

#[derive(Deserialize)]
#[allow(clippy::upper_case_acronyms)]
enum RsaKty {
    RSA,
}

#[derive(Deserialize)]
enum OctKty {
    #[serde(rename = "oct")]
    Octet,
}

#[derive(Deserialize)]
enum OkpKty {
    #[serde(rename = "OKP")]
    OctetKeyPair,
}

#[derive(Deserialize)]
enum Curve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
    #[serde(rename = "Ed25519")]
    Ed25519,
}
