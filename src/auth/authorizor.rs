use oso::{Oso, PolarClass};

use crate::auth::User;
use crate::entities::{Listing, Offer};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(User::get_polar_class())?;
    o.register_class(Listing::get_polar_class())?;
    o.register_class(Offer::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[cfg(test)]
fn listing_owned_by(owner: &User) -> Listing {
    Listing::new(owner.id, "Ahşap sandalye".into(), 500.0, None).unwrap()
}

#[test]
fn listing_owner_role_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let owner = User::new(Uuid::new_v4());
    let stranger = User::new(Uuid::new_v4());
    let listing = listing_owned_by(&owner);

    let result = authorizor.query_rule("has_role", (owner.clone(), "owner", listing.clone()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.query_rule("has_role", (stranger.clone(), "owner", listing.clone()));
    assert!(result.unwrap().next().is_none());

    let result = authorizor.is_allowed(owner.clone(), "respond_to_offers", listing.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner.clone(), "read_offers", listing.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(stranger.clone(), "respond_to_offers", listing.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(stranger.clone(), "read_offers", listing.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn make_offer_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let owner = User::new(Uuid::new_v4());
    let buyer = User::new(Uuid::new_v4());
    let listing = listing_owned_by(&owner);

    let result = authorizor.is_allowed(buyer.clone(), "make_offer", listing.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner.clone(), "make_offer", listing.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn offer_bidder_role_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();

    let owner = User::new(Uuid::new_v4());
    let bidder = User::new(Uuid::new_v4());
    let listing = listing_owned_by(&owner);
    let offer = Offer::new(listing.id, bidder.id, 450.0, None, None);

    let result = authorizor.query_rule("has_role", (bidder.clone(), "bidder", offer.clone()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.is_allowed(bidder.clone(), "read", offer.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(bidder.clone(), "withdraw", offer.clone());
    assert_eq!(result.unwrap(), true);

    // the listing owner reads offers through the listing, never withdraws them
    let result = authorizor.is_allowed(owner.clone(), "withdraw", offer.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(owner.clone(), "read", offer.clone());
    assert_eq!(result.unwrap(), false);
}
