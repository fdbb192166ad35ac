use crate::rate_limit::{CredentialLimiter, credential_limiter};
use crate::store::Store;
use std::sync::Arc;

/// Shared data across all requests. Cheap to clone; the store and the
/// limiter live behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub credential_limiter: Arc<CredentialLimiter>,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            store: Arc::new(Store::new()),
            credential_limiter: Arc::new(credential_limiter()),
            jwt_secret,
        }
    }
}
