//! The scheduling core: availability computation and reservation conflict
//! resolution. Everything here talks to the outside world through the traits
//! in [`ports`].

pub mod availability;
pub mod booking;
pub mod error;
pub mod overlap;
pub mod ports;
pub mod reminder;
pub mod slots;

pub use availability::AvailabilityEngine;
pub use booking::ReservationService;
pub use error::BookingError;
pub use reminder::ReminderScheduler;
