use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    Executor, Pool, Postgres, Row,
};
use uuid::Uuid;

use super::Store;
use crate::entities::{Listing, Offer, OfferStatus, Profile, Rating};
use crate::error::Error;

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip_all)]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: Pool<Postgres>) -> Result<Self, Error> {
        // TODO: move this to migrations
        pool.execute("CREATE TABLE IF NOT EXISTS profiles (id UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS listings (id UUID PRIMARY KEY, owner_id UUID NOT NULL, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS listings_owner_id_idx ON listings (owner_id)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS offers (id UUID PRIMARY KEY, listing_id UUID NOT NULL, bidder_id UUID NOT NULL, status VARCHAR NOT NULL, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL, CONSTRAINT fk_offer_listing FOREIGN KEY(listing_id) REFERENCES listings(id))")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS offers_bidder_id_idx ON offers (bidder_id)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS offers_listing_id_idx ON offers (listing_id)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS ratings (id UUID PRIMARY KEY, listing_id UUID NOT NULL, reviewer_id UUID NOT NULL, reviewee_id UUID NOT NULL, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL, CONSTRAINT ratings_reviewer_listing_key UNIQUE (reviewer_id, listing_id))")
            .await?;

        Ok(Self { pool })
    }
}

fn decode_data<T: DeserializeOwned>(row: &PgRow) -> Result<T, Error> {
    let Json(value): Json<T> = row.try_get("data")?;

    Ok(value)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> Result<Vec<T>, Error> {
    rows.iter().map(decode_data).collect()
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip_all, fields(offer_id = %offer.id))]
    async fn insert_offer(&self, offer: &Offer) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO offers (id, listing_id, bidder_id, status, created_at, data) VALUES ($1, $2, $3, $4, $5, $6)")
                .bind(&offer.id)
                .bind(&offer.listing_id)
                .bind(&offer.bidder_id)
                .bind(offer.status.name())
                .bind(&offer.created_at)
                .bind(Json(offer)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(offer_id = %offer.id, expected = expected.name()))]
    async fn update_offer(&self, offer: &Offer, expected: OfferStatus) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query("UPDATE offers SET status = $3, data = $4 WHERE id = $1 AND status = $2")
                    .bind(&offer.id)
                    .bind(expected.name())
                    .bind(offer.status.name())
                    .bind(Json(offer)),
            )
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // nothing matched: either the offer is gone or another writer moved it on
        let exists = conn
            .fetch_optional(sqlx::query("SELECT id FROM offers WHERE id = $1").bind(&offer.id))
            .await?
            .is_some();

        if exists {
            tracing::info!("offer changed concurrently");
            return Err(Error::invalid_state_error());
        }

        Err(Error::not_found_error())
    }

    #[tracing::instrument(skip(self))]
    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM offers WHERE id = $1").bind(&id))
            .await?;

        maybe_result.as_ref().map(decode_data).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn offers_made_by(&self, bidder_id: Uuid) -> Result<Vec<Offer>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM offers WHERE bidder_id = $1 ORDER BY created_at DESC",
                )
                .bind(&bidder_id),
            )
            .await?;

        decode_all(results)
    }

    #[tracing::instrument(skip(self))]
    async fn offers_received_by(&self, owner_id: Uuid) -> Result<Vec<Offer>, Error> {
        let query = "
            SELECT
                o.data AS data
            FROM
                offers o
                JOIN listings l ON l.id = o.listing_id
            WHERE
                l.owner_id = $1
            ORDER BY
                o.created_at DESC
        ";

        let mut conn = self.pool.acquire().await?;
        let results = conn
            .fetch_all(sqlx::query(query).bind(&owner_id))
            .await?;

        decode_all(results)
    }

    #[tracing::instrument(skip_all, fields(listing_id = %listing.id))]
    async fn insert_listing(&self, listing: &Listing) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO listings (id, owner_id, data) VALUES ($1, $2, $3)")
                .bind(&listing.id)
                .bind(&listing.owner_id)
                .bind(Json(listing)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM listings WHERE id = $1").bind(&id))
            .await?;

        maybe_result.as_ref().map(decode_data).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_listings(&self, ids: Vec<Uuid>) -> Result<Vec<Listing>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM listings WHERE id = ANY($1)").bind(ids))
            .await?;

        decode_all(results)
    }

    #[tracing::instrument(skip_all, fields(profile_id = %profile.id))]
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO profiles (id, data) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data")
                .bind(&profile.id)
                .bind(Json(profile)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM profiles WHERE id = $1").bind(&id))
            .await?;

        maybe_result.as_ref().map(decode_data).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_profiles(&self, ids: Vec<Uuid>) -> Result<Vec<Profile>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM profiles WHERE id = ANY($1)").bind(ids))
            .await?;

        decode_all(results)
    }

    #[tracing::instrument(skip_all, fields(listing_id = %rating.listing_id))]
    async fn insert_rating(&self, rating: &Rating) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        // a second rating for the same listing trips the unique constraint
        let result = conn
            .execute(
                sqlx::query("INSERT INTO ratings (id, listing_id, reviewer_id, reviewee_id, created_at, data) VALUES ($1, $2, $3, $4, $5, $6)")
                    .bind(&rating.id)
                    .bind(&rating.listing_id)
                    .bind(&rating.reviewer_id)
                    .bind(&rating.reviewee_id)
                    .bind(&rating.created_at)
                    .bind(Json(rating)),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(Error::already_rated_error()),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn ratings_for(&self, reviewee_id: Uuid) -> Result<Vec<Rating>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM ratings WHERE reviewee_id = $1 ORDER BY created_at DESC",
                )
                .bind(&reviewee_id),
            )
            .await?;

        decode_all(results)
    }
}
