use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Proxy Response Schemas ---

/// ErrorBody
///
/// Every error the API returns has this shape: a single, displayable `error` string.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ErrorBody {
    #[schema(example = "Failed to delete the ad request")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// DeleteSuccess
///
/// Body of a successful `DELETE /api/ad-requests/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct DeleteSuccess {
    pub success: bool,
}

impl DeleteSuccess {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
