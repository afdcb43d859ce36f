//! Domain entities used by the services. The REST layer maps these to the
//! DTOs in the `shared` crate; storage maps them to rows.

pub mod guardian;
pub mod registrant;

pub use guardian::{Guardian, Role};
pub use registrant::{AttendanceStatus, CredentialStatus, Registrant};
