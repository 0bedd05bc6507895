use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accounts::repo::Account;

/// Balance is taken as a raw JSON value so malformed input reaches the
/// validators instead of being rejected by the deserializer.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub id: Option<String>,
    pub balance: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub id: Option<String>,
    pub balance: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionInfo {
    pub dbname: String,
    pub user: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectionInfoResponse {
    pub success: bool,
    pub data: ConnectionInfo,
}

#[derive(Debug, Serialize)]
pub struct AccountEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Account,
}

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Account>,
}
