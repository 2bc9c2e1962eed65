use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::entities::{Listing, Offer, OfferStatus, Profile};

// Fixed so a client can sign in as a sample user with `x-user-id`.
pub const AYSE_ID: Uuid = Uuid::from_u128(0x5a3e_0000_0000_4000_8000_0000_0000_0001);
pub const MEHMET_ID: Uuid = Uuid::from_u128(0x5a3e_0000_0000_4000_8000_0000_0000_0002);
pub const ZEYNEP_ID: Uuid = Uuid::from_u128(0x5a3e_0000_0000_4000_8000_0000_0000_0003);

pub struct MockData {
    pub profiles: Vec<Profile>,
    pub listings: Vec<Listing>,
    pub offers: Vec<Offer>,
}

fn profile(id: Uuid, name: &str) -> Profile {
    Profile {
        id,
        display_name: name.into(),
        avatar_url: None,
    }
}

fn listing(owner: &Profile, title: &str, price: f64, image: &str) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        owner_id: owner.id,
        title: title.into(),
        image_url: Some(format!("https://images.takas.local/{}.jpg", image)),
        price,
        created_at: Utc::now() - Duration::days(3),
    }
}

fn answered(mut offer: Offer, status: OfferStatus) -> Offer {
    offer.status = status;
    offer.updated_at = Utc::now();
    offer
}

pub fn generate() -> MockData {
    let ayse = profile(AYSE_ID, "Ayşe Yılmaz");
    let mehmet = profile(MEHMET_ID, "Mehmet Kaya");
    let zeynep = profile(ZEYNEP_ID, "Zeynep Demir");

    let bike = listing(&ayse, "Şehir bisikleti", 2500.0, "bisiklet");
    let camera = listing(&mehmet, "Analog fotoğraf makinesi", 1800.0, "kamera");
    let sofa = listing(&zeynep, "İkili kanepe", 4000.0, "kanepe");

    let pending = Offer::new(
        bike.id,
        mehmet.id,
        2200.0,
        Some("Bugün teslim alabilirim.".into()),
        Some(Duration::hours(24)),
    );

    let countered = Offer {
        counter_offer_amount: Some(1700.0),
        counter_offer_message: Some("1700 son fiyat.".into()),
        ..answered(
            Offer::new(camera.id, zeynep.id, 1500.0, None, None),
            OfferStatus::Countered,
        )
    };

    let accepted = answered(
        Offer::new(sofa.id, ayse.id, 3800.0, None, None),
        OfferStatus::Accepted,
    );

    let rejected = answered(
        Offer::new(bike.id, zeynep.id, 1000.0, Some("Takas olur mu?".into()), None),
        OfferStatus::Rejected,
    );

    MockData {
        profiles: vec![ayse, mehmet, zeynep],
        listings: vec![bike, camera, sofa],
        offers: vec![rejected, accepted, countered, pending],
    }
}
