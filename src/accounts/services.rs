use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::ConnectionInfo;
use super::repo::{self, Account};
use crate::error::{is_unique_violation, ApiError};
use crate::state::AppState;

/// Canonical hyphenated 8-4-4-4-12 UUID form, case-insensitive.
pub(crate) fn is_valid_identifier(id: &str) -> bool {
    lazy_static! {
        static ref UUID_RE: Regex = Regex::new(
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
        )
        .unwrap();
    }
    UUID_RE.is_match(id)
}

/// Coerce a JSON value to a whole number in i64 range.
///
/// 2^63 - 1 is not representable as f64, so on the float path anything at or
/// above 2^63 is out of range.
pub(crate) fn coerce_balance(balance: &Value) -> Option<i64> {
    if let Some(n) = balance.as_i64() {
        return Some(n);
    }
    let f = balance.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return None;
    }
    Some(f as i64)
}

pub(crate) fn is_valid_balance(balance: &Value) -> bool {
    coerce_balance(balance).is_some()
}

/// Collect every failing check as a human-readable message, identifier
/// message first. Empty result means the input is valid.
pub(crate) fn validate_account_input(id: Option<&str>, balance: Option<&Value>) -> Vec<String> {
    let mut errors = Vec::new();

    match id {
        Some(id) if is_valid_identifier(id) => {}
        _ => errors.push("id must be a valid UUID".to_string()),
    }

    match balance {
        None | Some(Value::Null) => errors.push("balance is required".to_string()),
        Some(v) if !is_valid_balance(v) => {
            errors.push("balance must be a valid whole number".to_string())
        }
        Some(_) => {}
    }

    errors
}

pub async fn connection_info(state: &AppState) -> Result<ConnectionInfo, ApiError> {
    let (dbname, user, version) = repo::connection_info(&state.db).await?;
    let version = version.split(',').next().unwrap_or_default().to_string();
    Ok(ConnectionInfo {
        dbname,
        user,
        version,
    })
}

pub async fn create_account(
    state: &AppState,
    id: Option<String>,
    balance: Option<Value>,
) -> Result<Account, ApiError> {
    let id = id.unwrap_or_else(|| state.ids.generate().to_string());

    let errors = validate_account_input(Some(&id), balance.as_ref());
    if !errors.is_empty() {
        warn!(?errors, "create account rejected");
        return Err(ApiError::Validation(errors.join(", ")));
    }

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::Validation("id must be a valid UUID".to_string()))?;
    let balance = balance
        .as_ref()
        .and_then(coerce_balance)
        .ok_or_else(|| ApiError::Validation("balance must be a valid whole number".to_string()))?;

    match Account::insert(&state.db, id, balance).await {
        Ok(account) => {
            info!(%id, balance, "account created");
            Ok(account)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(%id, "duplicate account id");
            Err(ApiError::Validation(
                "account with this id already exists".to_string(),
            ))
        }
        Err(e) => Err(ApiError::Database(e)),
    }
}

pub async fn list_accounts(state: &AppState) -> Result<Vec<Account>, ApiError> {
    let accounts = Account::list(&state.db).await?;
    Ok(accounts)
}

pub async fn get_account(state: &AppState, id: &str) -> Result<Account, ApiError> {
    Account::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))
}

pub async fn update_account(
    state: &AppState,
    id: Option<String>,
    balance: Option<Value>,
) -> Result<Account, ApiError> {
    let errors = validate_account_input(id.as_deref(), balance.as_ref());
    if !errors.is_empty() {
        warn!(?errors, "update account rejected");
        return Err(ApiError::Validation(errors.join(", ")));
    }

    let id = id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ApiError::Validation("id must be a valid UUID".to_string()))?;
    let balance = balance
        .as_ref()
        .and_then(coerce_balance)
        .ok_or_else(|| ApiError::Validation("balance must be a valid whole number".to_string()))?;

    let updated = Account::update_balance(&state.db, id, balance)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    info!(%id, balance, "account updated");
    Ok(updated)
}

pub async fn delete_account(state: &AppState, id: Option<String>) -> Result<Account, ApiError> {
    let id = match id {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("delete account rejected: missing id");
            return Err(ApiError::Validation("id is required".to_string()));
        }
    };

    let deleted = Account::delete(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    info!(%id, "account deleted");
    Ok(deleted)
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifier_accepts_canonical_uuids() {
        assert!(is_valid_identifier("11111111-1111-1111-1111-111111111111"));
        assert!(is_valid_identifier("A9B8C7D6-E5F4-4321-8765-0123456789AB"));
        assert!(is_valid_identifier(&Uuid::new_v4().to_string()));
    }

    #[test]
    fn identifier_rejects_non_canonical_forms() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("not-a-uuid"));
        // unhyphenated simple form is not the canonical textual syntax
        assert!(!is_valid_identifier("11111111111111111111111111111111"));
        assert!(!is_valid_identifier(
            "{11111111-1111-1111-1111-111111111111}"
        ));
        assert!(!is_valid_identifier("11111111-1111-1111-1111-11111111111"));
        assert!(!is_valid_identifier("11111111-1111-1111-1111-1111111111112"));
        assert!(!is_valid_identifier("1111111g-1111-1111-1111-111111111111"));
    }

    #[test]
    fn balance_accepts_whole_numbers_in_range() {
        assert_eq!(coerce_balance(&json!(0)), Some(0));
        assert_eq!(coerce_balance(&json!(-500)), Some(-500));
        assert_eq!(coerce_balance(&json!(i64::MAX)), Some(i64::MAX));
        assert_eq!(coerce_balance(&json!(i64::MIN)), Some(i64::MIN));
        // whole floats coerce
        assert_eq!(coerce_balance(&json!(750.0)), Some(750));
    }

    #[test]
    fn balance_rejects_fractions_strings_and_out_of_range() {
        assert!(!is_valid_balance(&json!(10.5)));
        assert!(!is_valid_balance(&json!("100")));
        assert!(!is_valid_balance(&json!(true)));
        assert!(!is_valid_balance(&json!(null)));
        assert!(!is_valid_balance(&json!([1])));
        // 2^63 parses as u64 and exceeds the signed range
        assert!(!is_valid_balance(&json!(9223372036854775808u64)));
        assert!(!is_valid_balance(&json!(1e19)));
        assert!(!is_valid_balance(&json!(-1e19)));
    }

    #[test]
    fn aggregate_collects_every_failure_in_order() {
        let errors = validate_account_input(Some("nope"), Some(&json!(1.5)));
        assert_eq!(
            errors,
            vec![
                "id must be a valid UUID".to_string(),
                "balance must be a valid whole number".to_string(),
            ]
        );
    }

    #[test]
    fn aggregate_treats_missing_and_null_balance_as_required() {
        let id = "11111111-1111-1111-1111-111111111111";
        assert_eq!(
            validate_account_input(Some(id), None),
            vec!["balance is required".to_string()]
        );
        assert_eq!(
            validate_account_input(Some(id), Some(&json!(null))),
            vec!["balance is required".to_string()]
        );
    }

    #[test]
    fn aggregate_is_empty_for_valid_input() {
        let id = "11111111-1111-1111-1111-111111111111";
        assert!(validate_account_input(Some(id), Some(&json!(500))).is_empty());
    }

    #[test]
    fn aggregate_flags_missing_id() {
        assert_eq!(
            validate_account_input(None, Some(&json!(500))),
            vec!["id must be a valid UUID".to_string()]
        );
    }
}

#[cfg(test)]
mod service_tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::json;

    // AppState::fake() holds a lazy pool, so these prove malformed input is
    // rejected before any store access is attempted.

    #[tokio::test]
    async fn create_rejects_fractional_balance_before_store() {
        let state = AppState::fake();
        let err = create_account(
            &state,
            Some("11111111-1111-1111-1111-111111111111".into()),
            Some(json!(10.5)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("whole number"));
    }

    #[tokio::test]
    async fn create_rejects_malformed_id_before_store() {
        let state = AppState::fake();
        let err = create_account(&state, Some("not-a-uuid".into()), Some(json!(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("valid UUID"));
    }

    #[tokio::test]
    async fn create_reports_both_problems_at_once() {
        let state = AppState::fake();
        let err = create_account(&state, Some("bogus".into()), None)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("id must be a valid UUID"));
        assert!(message.contains("balance is required"));
        // identifier problem comes first
        assert!(message.find("id must").unwrap() < message.find("balance is").unwrap());
    }

    #[tokio::test]
    async fn update_rejects_missing_id_before_store() {
        let state = AppState::fake();
        let err = update_account(&state, None, Some(json!(500)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("valid UUID"));
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_balance_before_store() {
        let state = AppState::fake();
        let err = update_account(
            &state,
            Some("11111111-1111-1111-1111-111111111111".into()),
            Some(json!(9223372036854775808u64)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_rejects_missing_or_empty_id_before_store() {
        let state = AppState::fake();

        let err = delete_account(&state, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("id is required"));

        let err = delete_account(&state, Some(String::new())).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
