use serde_json::json;

use super::user_service::PROFILES;
use crate::api::{BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::CreditBalanceRow;

/// Read/write rounds before a contended balance is reported.
pub(crate) const CREDIT_UPDATE_ATTEMPTS: usize = 3;

/// Read a user's balance and write `change(balance)` back.
///
/// The write only matches while the stored balance still equals the value
/// read. When it matches nothing the balance is read again and `change`
/// re-applied, up to `CREDIT_UPDATE_ATTEMPTS` rounds, after which the call
/// fails with `ConcurrentCreditUpdate`. Returns the new balance, or `None`
/// when `change` declined to write.
pub(crate) async fn adjust_credits<F>(
    client: &BackendClient,
    user_id: &str,
    change: F,
) -> DataResult<Option<u32>>
where
    F: Fn(u32) -> Option<u32>,
{
    for attempt in 1..=CREDIT_UPDATE_ATTEMPTS {
        let row = read_balance(client, user_id).await?;

        let current = row.balance();
        let Some(next) = change(current) else {
            return Ok(None);
        };

        let guard = Query::new().eq("id", user_id);
        let guard = match row.package_credits {
            Some(raw) => guard.eq("package_credits", raw),
            None => guard.is_null("package_credits"),
        };

        let updated: Vec<CreditBalanceRow> = client
            .update(PROFILES, &guard, &json!({ "package_credits": next }))
            .await?;

        if !updated.is_empty() {
            tracing::debug!("Credits for {}: {} -> {}", user_id, current, next);
            return Ok(Some(next));
        }

        tracing::debug!(
            "Credit balance for {} changed between read and write (attempt {}/{})",
            user_id,
            attempt,
            CREDIT_UPDATE_ATTEMPTS
        );
    }

    tracing::warn!(
        "Giving up on credit update for {} after {} attempts",
        user_id,
        CREDIT_UPDATE_ATTEMPTS
    );
    Err(DataError::ConcurrentCreditUpdate {
        user_id: user_id.to_string(),
    })
}

async fn read_balance(client: &BackendClient, user_id: &str) -> DataResult<CreditBalanceRow> {
    client
        .select_one(PROFILES, &Query::new().select("package_credits").eq("id", user_id))
        .await?
        .ok_or_else(|| DataError::NotFound {
            entity: "profile",
            id: user_id.to_string(),
        })
}
