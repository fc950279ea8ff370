mod bearer_token;

pub use bearer_token::{AuthError, Credentials, fetch_bearer_token};
