//! Payment processing stubs.
//!
//! No payment provider is called: a payment id is issued and reported as
//! processing, and any lookup reports it as completed.

use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use websale_core::events::DomainEvent;
use websale_core::{OrderId, PaymentStatus};

use crate::error::Result;
use crate::extract::{Json, Path};
use crate::state::AppState;

/// `POST /api/payments/process` body. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessPaymentInput {
    pub order_id: Option<OrderId>,
    pub amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub status: PaymentStatus,
}

/// `POST /api/payments/process`
pub async fn process(
    State(state): State<AppState>,
    Json(input): Json<ProcessPaymentInput>,
) -> Result<Json<PaymentResponse>> {
    let payment_id = Uuid::new_v4();

    tracing::info!(
        %payment_id,
        order_id = ?input.order_id,
        amount = ?input.amount,
        method = input.payment_method.as_deref().unwrap_or("unspecified"),
        "Payment accepted"
    );
    state.events().publish(DomainEvent::PaymentProcessed {
        payment_id: payment_id.to_string(),
        order_id: input.order_id,
    });

    Ok(Json(PaymentResponse {
        payment_id,
        status: PaymentStatus::Processing,
    }))
}

/// `GET /api/payments/{id}`
pub async fn show(Path(payment_id): Path<Uuid>) -> Json<PaymentResponse> {
    Json(PaymentResponse {
        payment_id,
        status: PaymentStatus::Completed,
    })
}
