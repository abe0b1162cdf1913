pub mod admin;
pub mod availability;
pub mod reservations;
pub mod specialists;
