//! Shipment stubs.
//!
//! Shipments are not persisted; the tracking number is derived from the
//! shipping id so repeated lookups agree.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use websale_core::events::DomainEvent;
use websale_core::{OrderId, ShipmentStatus};

use crate::error::Result;
use crate::extract::{Json, Path};
use crate::models::order::Address;
use crate::state::AppState;

/// `POST /api/shipping/create` body. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateShipmentInput {
    pub order_id: Option<OrderId>,
    pub address: Option<Address>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub shipping_id: Uuid,
    pub status: ShipmentStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub shipping_id: Uuid,
    pub status: ShipmentStatus,
    pub tracking_number: String,
}

/// `TR` followed by nine digits taken from the shipping id.
#[must_use]
pub fn tracking_number(shipping_id: Uuid) -> String {
    format!("TR{:09}", shipping_id.as_u128() % 1_000_000_000)
}

/// `POST /api/shipping/create`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateShipmentInput>,
) -> Result<Json<ShipmentResponse>> {
    let shipping_id = Uuid::new_v4();

    tracing::info!(
        %shipping_id,
        order_id = ?input.order_id,
        city = input.address.as_ref().map_or("unspecified", |a| a.city.as_str()),
        "Shipment created"
    );
    state.events().publish(DomainEvent::ShipmentCreated {
        shipping_id: shipping_id.to_string(),
        order_id: input.order_id,
    });

    Ok(Json(ShipmentResponse {
        shipping_id,
        status: ShipmentStatus::Created,
    }))
}

/// `GET /api/shipping/{id}/track`
pub async fn track(Path(shipping_id): Path<Uuid>) -> Json<TrackingResponse> {
    Json(TrackingResponse {
        shipping_id,
        status: ShipmentStatus::InTransit,
        tracking_number: tracking_number(shipping_id),
    })
}
