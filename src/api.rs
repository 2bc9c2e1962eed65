use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Listing, Offer, OfferResponse, OfferStats, OfferView, Profile, Rating};
use crate::error::Error;

#[async_trait]
pub trait OfferAPI {
    async fn list_my_offers(&self, user: User) -> Result<Vec<OfferView>, Error>;
    async fn list_received_offers(&self, user: User) -> Result<Vec<OfferView>, Error>;
    async fn get_offer_stats(&self, user: User) -> Result<OfferStats, Error>;
    async fn find_offer(&self, user: User, id: Uuid) -> Result<OfferView, Error>;

    async fn create_offer(
        &self,
        user: User,
        listing_id: Uuid,
        amount: f64,
        message: Option<String>,
        expires_in_24h: bool,
    ) -> Result<Offer, Error>;

    async fn respond_to_offer(
        &self,
        user: User,
        id: Uuid,
        response: OfferResponse,
    ) -> Result<Offer, Error>;

    async fn withdraw_offer(&self, user: User, id: Uuid) -> Result<Offer, Error>;
}

#[async_trait]
pub trait ListingAPI {
    async fn create_listing(
        &self,
        user: User,
        title: String,
        price: f64,
        image_url: Option<String>,
    ) -> Result<Listing, Error>;

    async fn find_listing(&self, user: User, id: Uuid) -> Result<Listing, Error>;
}

#[async_trait]
pub trait ProfileAPI {
    async fn upsert_profile(
        &self,
        user: User,
        display_name: String,
        avatar_url: Option<String>,
    ) -> Result<Profile, Error>;

    async fn find_profile(&self, user: User, id: Uuid) -> Result<Profile, Error>;
}

#[async_trait]
pub trait RatingAPI {
    async fn create_rating(
        &self,
        user: User,
        listing_id: Uuid,
        reviewee_id: Uuid,
        score: u8,
        comment: Option<String>,
    ) -> Result<Rating, Error>;

    async fn list_ratings(&self, user: User, reviewee_id: Uuid) -> Result<Vec<Rating>, Error>;
}

pub trait API: OfferAPI + ListingAPI + ProfileAPI + RatingAPI {}
