pub mod db;
pub mod repositories;

pub use db::DbConnection;
pub use repositories::{GuardianRepository, RegistrantRepository};
