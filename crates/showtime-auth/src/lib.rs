//! # showtime-auth
//!
//! Credential issuance, validation, rotation, and revocation for the
//! Showtime reservation API.
//!
//! ## Modules
//!
//! - `jwt`: signed credential issue/parse restricted to the HMAC family
//! - `session`: identity → refresh credential store and the protect/rotate gates
//! - `password`: Argon2id hashing plus email and password policy checks
//! - `service`: registration, authentication, and session issuance
//! - `audit`: tracing-backed security audit sink

pub mod audit;
pub mod jwt;
pub mod password;
pub mod service;
pub mod session;

pub use audit::TracingAuditSink;
pub use jwt::{AccessGrant, Claims, TokenCodec, TokenError, TokenKind, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use service::{AuthService, Credentials, LoginOutcome, LoginSummary, RegistrationSummary};
pub use session::{RotatedSession, RotationOutcome, SessionGate, SessionStore};
