use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ListingAPI;
use crate::auth::User;
use crate::entities::Listing;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    title: String,
    price: f64,
    image_url: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Listing>, Error> {
    let listing = api
        .create_listing(user, params.title, params.price, params.image_url)
        .await?;

    Ok(listing.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, Error> {
    let listing = api.find_listing(user, id).await?;

    Ok(listing.into())
}
