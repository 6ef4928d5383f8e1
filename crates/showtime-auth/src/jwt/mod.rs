//! Signed credential construction and parsing.

pub mod claims;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use claims::{Claims, TokenKind};
pub use codec::{AccessGrant, TokenCodec, TokenPair};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder};
pub use error::TokenError;
