//! Token issuance, verification, and unverified decoding.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod service;
pub mod unverified;

pub use claims::{Claims, TokenKind};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};
pub use service::TokenService;
pub use unverified::UnverifiedClaims;
