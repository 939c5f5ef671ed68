//! Login session tokens, stored in the key-value store.

use serde::{Deserialize, Serialize};

use relay_common::id::prefix;

use crate::error::ApiError;
use crate::store::kv::KeyValueStore;

/// Generate an opaque random token with the given prefix.
pub fn generate_opaque_token(prefix: &str, bytes: usize) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(&mut buf[..]);
    format!("{}_{}", prefix, URL_SAFE_NO_PAD.encode(&buf))
}

/// Data stored alongside a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub username: String,
}

pub fn generate_session_token() -> String {
    generate_opaque_token(prefix::SESSION, 32)
}

fn session_key(token: &str) -> String {
    format!("relay:session:{}", token)
}

pub async fn store_session(
    kv: &dyn KeyValueStore,
    token: &str,
    data: &SessionData,
    ttl_secs: u64,
) -> Result<(), ApiError> {
    let value = serde_json::to_string(data).map_err(|_| ApiError::internal("serialization"))?;
    kv.set_ex(&session_key(token), &value, ttl_secs).await
}

pub async fn lookup_session(
    kv: &dyn KeyValueStore,
    token: &str,
) -> Result<Option<SessionData>, ApiError> {
    match kv.get(&session_key(token)).await? {
        Some(v) => {
            let data: SessionData =
                serde_json::from_str(&v).map_err(|_| ApiError::internal("corrupt session data"))?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

pub async fn revoke_session(kv: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    kv.del(&session_key(token)).await
}
