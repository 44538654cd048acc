//! ROI and vendor scoring handlers

use crate::api::rest::actor::Actor;
use crate::error::ApiResult;
use aigov_rules::permissions::{ROI_CALCULATE, VENDOR_EVALUATE};
use aigov_rules::{RoiInput, RoiResult, VendorRating, VendorScore};
use axum::Json;
use serde::Deserialize;

pub async fn calculate_roi(
    actor: Actor,
    Json(input): Json<RoiInput>,
) -> ApiResult<Json<RoiResult>> {
    actor.require(ROI_CALCULATE)?;
    let result = aigov_rules::calculate_roi(&input)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ScoreVendorRequest {
    pub vendor: String,
    pub ratings: Vec<VendorRating>,
}

pub async fn score_vendor(
    actor: Actor,
    Json(request): Json<ScoreVendorRequest>,
) -> ApiResult<Json<VendorScore>> {
    actor.require(VENDOR_EVALUATE)?;
    let score = aigov_rules::score_vendor(&request.vendor, &request.ratings)?;

    tracing::info!(vendor = %score.vendor, score = score.score, tier = ?score.tier, "Scored vendor");

    Ok(Json(score))
}
