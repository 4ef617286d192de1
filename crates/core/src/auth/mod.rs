mod error;
mod validation;
mod verifier;

pub use error::AuthRejection;
pub use validation::{parse_bearer_header, BEARER_SCHEME};
pub use verifier::{Claims, TokenVerifier};
