//! Payment-provider webhook. Stateless per invocation: an approved payment
//! maps to an additive credit grant and a tier overwrite
//! (last-purchased-wins). Retries are the provider's responsibility; no
//! idempotency key is kept, so a duplicate delivery double-credits.

pub mod plans;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::ProfileStore;

/// Provider payload. Only the fields this handler reads are declared; the
/// purchaser email arrives either nested under `customer` or at the top
/// level depending on the provider's payload version.
#[derive(Debug, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub email: Option<String>,
}

impl PaymentNotification {
    fn purchaser_email(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .or(self.email.as_deref())
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

/// Applies one payment notification against the store.
pub async fn process_payment(
    store: &dyn ProfileStore,
    payload: &PaymentNotification,
) -> Result<WebhookAck, AppError> {
    if payload.order_status.as_deref() != Some("paid") {
        return Ok(WebhookAck {
            success: true,
            message: "order not paid, ignoring".to_string(),
        });
    }

    let email = payload
        .purchaser_email()
        .ok_or_else(|| AppError::Validation("purchaser email missing from payload".to_string()))?;

    let Some((tier, credits_to_add)) =
        plans::resolve_plan(payload.product_id.as_deref(), payload.product_name.as_deref())
    else {
        info!(
            "Webhook for unrecognized product (id: {:?}, name: {:?}); no credits granted",
            payload.product_id, payload.product_name
        );
        return Ok(WebhookAck {
            success: true,
            message: "product not recognized, no credits granted".to_string(),
        });
    };

    let profile = store
        .profile_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no profile for {email}")))?;

    store
        .apply_purchase(profile.id, tier, credits_to_add)
        .await?;

    info!(
        "Webhook credited {} with {} ({} -> {})",
        email,
        credits_to_add,
        profile.tier.as_str(),
        tier.as_str()
    );
    Ok(WebhookAck {
        success: true,
        message: format!("{credits_to_add} credits released"),
    })
}

/// POST /api/webhook/payment — the router answers 405 for any other method.
pub async fn handle_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentNotification>,
) -> Result<Json<WebhookAck>, AppError> {
    let ack = process_payment(state.store.as_ref(), &payload).await?;
    Ok(Json(ack))
}
