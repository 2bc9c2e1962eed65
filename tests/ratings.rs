use std::sync::Arc;
use std::time::Duration;

use takas::api::{ListingAPI, OfferAPI, ProfileAPI, RatingAPI};
use takas::auth::User;
use takas::cache::ViewCache;
use takas::engine::Engine;
use takas::entities::OfferResponse;
use takas::retry::RetryPolicy;
use takas::store::MemoryStore;
use uuid::Uuid;

async fn engine_with_users(names: &[&str]) -> (Engine, Vec<User>) {
    let engine = Engine::new(
        Arc::new(MemoryStore::new()),
        RetryPolicy::none(),
        ViewCache::new(Duration::ZERO),
    )
    .unwrap();

    let mut users = Vec::new();
    for name in names {
        let user = User::new(Uuid::new_v4());
        engine
            .upsert_profile(user.clone(), name.to_string(), None)
            .await
            .unwrap();
        users.push(user);
    }

    (engine, users)
}

#[tokio::test]
async fn parties_of_an_accepted_offer_rate_each_other_once() {
    let (engine, users) = engine_with_users(&["Zeynep", "Mehmet"]).await;
    let (seller, buyer) = (users[0].clone(), users[1].clone());

    let listing = engine
        .create_listing(seller.clone(), "Koltuk".into(), 1200.0, None)
        .await
        .unwrap();
    let offer = engine
        .create_offer(buyer.clone(), listing.id, 1000.0, None, false)
        .await
        .unwrap();
    engine
        .respond_to_offer(seller.clone(), offer.id, OfferResponse::Accept)
        .await
        .unwrap();

    let rating = engine
        .create_rating(buyer.clone(), listing.id, seller.id, 5, Some("Sorunsuz".into()))
        .await
        .unwrap();
    assert_eq!(rating.reviewee_id, seller.id);

    engine
        .create_rating(seller.clone(), listing.id, buyer.id, 4, None)
        .await
        .unwrap();

    let err = engine
        .create_rating(buyer.clone(), listing.id, seller.id, 1, None)
        .await
        .unwrap_err();
    assert!(err.is_already_rated_error());

    let ratings = engine.list_ratings(buyer, seller.id).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].score, 5);
}

#[tokio::test]
async fn rating_needs_an_accepted_offer() {
    let (engine, users) = engine_with_users(&["Zeynep", "Mehmet"]).await;
    let (seller, buyer) = (users[0].clone(), users[1].clone());

    let listing = engine
        .create_listing(seller.clone(), "Koltuk".into(), 1200.0, None)
        .await
        .unwrap();
    engine
        .create_offer(buyer.clone(), listing.id, 1000.0, None, false)
        .await
        .unwrap();

    let err = engine
        .create_rating(buyer, listing.id, seller.id, 5, None)
        .await
        .unwrap_err();

    assert!(err.is_invalid_state_error());
}

#[tokio::test]
async fn outsiders_cannot_rate_a_trade() {
    let (engine, users) = engine_with_users(&["Zeynep", "Mehmet", "Ayşe"]).await;
    let (seller, buyer, outsider) = (users[0].clone(), users[1].clone(), users[2].clone());

    let listing = engine
        .create_listing(seller.clone(), "Koltuk".into(), 1200.0, None)
        .await
        .unwrap();

    let err = engine
        .create_rating(outsider, listing.id, buyer.id, 3, None)
        .await
        .unwrap_err();

    assert!(err.is_unauthorized_error());
}

#[tokio::test]
async fn score_outside_one_to_five_is_invalid() {
    let (engine, users) = engine_with_users(&["Zeynep", "Mehmet"]).await;

    for score in [0, 6] {
        let err = engine
            .create_rating(users[1].clone(), Uuid::new_v4(), users[0].id, score, None)
            .await
            .unwrap_err();

        assert!(err.is_invalid_input_error());
    }
}
