mod business;
mod reservation;
mod service;
mod specialist;
mod user;

pub use business::*;
pub use reservation::*;
pub use service::*;
pub use specialist::*;
pub use user::*;
