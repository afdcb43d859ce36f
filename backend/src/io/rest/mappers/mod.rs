pub mod guardian_mapper;
pub mod registrant_mapper;

pub use guardian_mapper::GuardianMapper;
pub use registrant_mapper::RegistrantMapper;
