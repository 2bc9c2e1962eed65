use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        owner_id: Uuid,
        title: String,
        price: f64,
        image_url: Option<String>,
    ) -> Result<Self, Error> {
        if title.trim().is_empty() || !price.is_finite() || price < 0.0 {
            return Err(Error::invalid_input_error());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            image_url,
            price,
            created_at: Utc::now(),
        })
    }
}

impl PolarClass for Listing {
    fn get_polar_class_builder() -> oso::ClassBuilder<Listing> {
        oso::Class::builder()
            .name("Listing")
            .add_attribute_getter("id", |recv: &Listing| recv.id.to_string())
            .add_attribute_getter("owner_id", |recv: &Listing| recv.owner_id.to_string())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Listing::get_polar_class_builder();
        builder.build()
    }
}
