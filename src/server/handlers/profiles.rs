use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ProfileAPI;
use crate::auth::User;
use crate::entities::Profile;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct UpsertParams {
    display_name: String,
    avatar_url: Option<String>,
}

pub async fn upsert(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<UpsertParams>,
) -> Result<Json<Profile>, Error> {
    let profile = api
        .upsert_profile(user, params.display_name, params.avatar_url)
        .await?;

    Ok(profile.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, Error> {
    let profile = api.find_profile(user, id).await?;

    Ok(profile.into())
}
