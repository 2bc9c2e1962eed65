use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::OfferAPI;
use crate::auth::User;
use crate::entities::{Offer, OfferResponse, OfferStats, OfferView};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    listing_id: Uuid,
    amount: f64,
    message: Option<String>,
    #[serde(default)]
    expires_in_24h: bool,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Offer>, Error> {
    let offer = api
        .create_offer(
            user,
            params.listing_id,
            params.amount,
            params.message,
            params.expires_in_24h,
        )
        .await?;

    Ok(offer.into())
}

pub async fn list_made(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<OfferView>>, Error> {
    let offers = api.list_my_offers(user).await?;

    Ok(offers.into())
}

pub async fn list_received(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<OfferView>>, Error> {
    let offers = api.list_received_offers(user).await?;

    Ok(offers.into())
}

pub async fn stats(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<OfferStats>, Error> {
    let stats = api.get_offer_stats(user).await?;

    Ok(stats.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferView>, Error> {
    let offer = api.find_offer(user, id).await?;

    Ok(offer.into())
}

pub async fn respond(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(response): Json<OfferResponse>,
) -> Result<Json<Offer>, Error> {
    let offer = api.respond_to_offer(user, id, response).await?;

    Ok(offer.into())
}

pub async fn withdraw(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, Error> {
    let offer = api.withdraw_offer(user, id).await?;

    Ok(offer.into())
}
