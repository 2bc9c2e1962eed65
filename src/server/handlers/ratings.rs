use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::RatingAPI;
use crate::auth::User;
use crate::entities::Rating;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    listing_id: Uuid,
    reviewee_id: Uuid,
    score: u8,
    comment: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Rating>, Error> {
    let rating = api
        .create_rating(
            user,
            params.listing_id,
            params.reviewee_id,
            params.score,
            params.comment,
        )
        .await?;

    Ok(rating.into())
}

/// Ratings received by the profile in the path.
pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Rating>>, Error> {
    let ratings = api.list_ratings(user, id).await?;

    Ok(ratings.into())
}
