//! Error taxonomy for the synchronization flow
//!
//! `ApiError` is a remote communication failure (HTTP error, bad status,
//! undecodable body). `SyncError` is the business-level failure an
//! orchestrator turns into a failed mutation record; remote failures are
//! wrapped rather than propagated raw.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("tax mapping for tax amount {0} does not exist")]
    MissingTaxMapping(Decimal),
    #[error("no shipping method configured for this destination and no default is set")]
    MissingShippingMethod,
    #[error("shipping method '{0}' is not present in the cached shipping methods")]
    UnknownShippingMethod(String),
    #[error("multiple remote relations found for name '{0}'")]
    AmbiguousCustomerMatch(String),
    #[error("remote relation {0} is already linked to another customer")]
    RemoteIdAlreadyClaimed(String),
    #[error("all address lines are empty")]
    EmptyAddress,
    #[error("required field missing from source document: {0}")]
    MissingField(&'static str),
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// Wrap a remote communication failure with call-site context.
    pub fn api(context: impl Into<String>, source: ApiError) -> Self {
        SyncError::Api {
            context: context.into(),
            source,
        }
    }
}
