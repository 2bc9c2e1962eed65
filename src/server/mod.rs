mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post, put},
    Router,
};

use crate::server::handlers::{listings, offers, profiles, ratings};
use crate::{api::API, error::Error};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/offers", post(offers::create))
        .route("/offers/made", get(offers::list_made))
        .route("/offers/received", get(offers::list_received))
        .route("/offers/stats", get(offers::stats))
        .route("/offers/:id", get(offers::find))
        .route("/offers/:id/respond", patch(offers::respond))
        .route("/offers/:id/withdraw", patch(offers::withdraw))
        .route("/listings", post(listings::create))
        .route("/listings/:id", get(listings::find))
        .route("/profile", put(profiles::upsert))
        .route("/profiles/:id", get(profiles::find))
        .route("/profiles/:id/ratings", get(ratings::list))
        .route("/ratings", post(ratings::create))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(|err| {
            tracing::error!(error = %err, "could not bind");
            Error::unexpected_error()
        })?
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "server stopped");
            Error::unexpected_error()
        })
}
