//! Thin clients for the three external REST APIs
//!
//! Each client is a cloneable struct wrapping a shared `reqwest::Client`,
//! constructed once from `AppConfig` and passed explicitly into the
//! orchestrators. The `*Api` traits exist so tests can substitute fakes.

use std::time::Duration;

use crate::error::ApiError;

pub mod sendcloud;
pub mod snelstart;
pub mod uphance;

pub use sendcloud::{CarrierApi, SendcloudClient};
pub use snelstart::{LedgerApi, SnelstartClient};
pub use uphance::{SourceApi, UphanceClient};

const MAX_ATTEMPTS: u32 = 3;
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Send a request with bounded retry and exponential backoff on transient
/// downstream statuses. Non-success responses become `ApiError::Status`.
pub(crate) async fn send_with_retry(
    builder: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ApiError> {
    let mut delay = Duration::from_millis(500);

    for attempt in 1..=MAX_ATTEMPTS {
        let request = match builder.try_clone() {
            Some(clone) => clone,
            // Streaming bodies cannot be cloned; single shot.
            None => return check_status(builder.send().await?).await,
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if !RETRYABLE_STATUSES.contains(&status) || attempt == MAX_ATTEMPTS {
                    return check_status(response).await;
                }
                tracing::warn!(
                    "Remote returned {}, retrying (attempt {}/{})",
                    status,
                    attempt,
                    MAX_ATTEMPTS
                );
            }
            Err(e) => {
                if attempt == MAX_ATTEMPTS {
                    return Err(e.into());
                }
                tracing::warn!("Request failed: {}, retrying (attempt {}/{})", e, attempt, MAX_ATTEMPTS);
            }
        }

        tokio::time::sleep(delay).await;
        delay *= 2;
    }

    unreachable!("retry loop always returns on the last attempt")
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
