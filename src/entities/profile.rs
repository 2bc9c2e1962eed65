use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn new(id: Uuid, display_name: String, avatar_url: Option<String>) -> Result<Self, Error> {
        if display_name.trim().is_empty() {
            return Err(Error::invalid_input_error());
        }

        Ok(Self {
            id,
            display_name,
            avatar_url,
        })
    }
}
