// src/github/auth.rs
// =============================================================================
// Checks a personal access token by asking GitHub who it belongs to.
//
// One request to GET /user, no retries. A 401 means the token is bad and the
// caller should forget it; anything else non-2xx is reported with its status.
// =============================================================================

use tracing::debug;

use super::transport::{HttpRequest, Transport};
use super::types::UserIdentity;
use crate::error::FetchError;

pub async fn verify_credential(
    transport: &dyn Transport,
    api_base: &str,
    token: &str,
) -> Result<UserIdentity, FetchError> {
    let url = format!("{}/user", api_base.trim_end_matches('/'));
    let response = transport.get(HttpRequest::api(url, Some(token))).await?;

    match response.status {
        401 => Err(FetchError::Auth),
        s if !response.is_success() => Err(FetchError::UnexpectedStatus {
            status: s,
            context: "Failed to fetch user data".to_string(),
        }),
        _ => {
            let user: UserIdentity = response.json()?;
            debug!(login = %user.login, "credential verified");
            Ok(user)
        }
    }
}
