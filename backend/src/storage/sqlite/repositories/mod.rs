pub mod guardian_repository;
pub mod registrant_repository;

pub use guardian_repository::GuardianRepository;
pub use registrant_repository::RegistrantRepository;
