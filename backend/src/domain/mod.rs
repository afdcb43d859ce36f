//! # Domain Module
//!
//! Contains all business logic for the registration and check-in system.
//!
//! This module encapsulates the rules that turn a submitted form into a
//! registrant with an issued QR credential, and everything that happens to
//! that registrant afterwards. It operates independently of any specific web
//! framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **registration_service**: Registrant intake, validation, credential issue
//! - **checkin_service**: Attendance toggling at the check-in desk
//! - **notification_service**: Credential delivery over email and SMS
//! - **guardian_service**: Guardian account records
//! - **credential**: QR encoding and object-key derivation
//! - **images**: Photo upload limits and downscaling
//! - **email / sms**: Outbound transport seams and implementations
//!
//! ## Key Responsibilities
//!
//! - **Validation**: Field-tagged form validation with a fixed check order
//! - **Credential Lifecycle**: Rows are created `Pending` and flipped to
//!   `Ready` once their credential uploads; reconciliation repairs the gap
//! - **Access Scoping**: Guardians see their own registrants, admins see all
//! - **Delivery**: One aggregated message per contact lookup

pub mod actor;
pub mod checkin_service;
pub mod commands;
pub mod credential;
pub mod email;
pub mod errors;
pub mod guardian_service;
pub mod images;
pub mod models;
pub mod notification_service;
pub mod registration_service;
pub mod sms;

pub use actor::*;
pub use checkin_service::*;
pub use commands::*;
pub use errors::*;
pub use guardian_service::*;
pub use notification_service::*;
pub use registration_service::*;
