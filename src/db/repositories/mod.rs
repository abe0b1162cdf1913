mod business_repository;
mod reservation_repository;
mod service_repository;
mod specialist_repository;
mod user_repository;

pub use business_repository::BusinessRepository;
pub use reservation_repository::ReservationRepository;
pub use service_repository::ServiceRepository;
pub use specialist_repository::SpecialistRepository;
pub use user_repository::UserRepository;
