pub mod cancel;
pub mod service;
pub mod types;
pub mod verifier;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use service::OracleLoop;
pub use types::{NextRequest, RunSummary, VerificationRequest};
pub use verifier::IdentityVerifier;
