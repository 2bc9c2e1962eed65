pub mod listings;
pub mod offers;
pub mod profiles;
pub mod ratings;
