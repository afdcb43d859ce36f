//! # Storage Module
//!
//! Handles all data persistence for the registration backend.
//!
//! This module abstracts away the specific storage implementation details and
//! provides a consistent interface for persisting and retrieving data. Two
//! kinds of storage live here: the registration store (rows) and the object
//! store (credential and photo bytes behind public URLs).
//!
//! ## Key Responsibilities
//!
//! - **Registration Store**: Registrant and guardian rows in SQLite via SQLx
//! - **Object Store**: Public-read credential and photo objects
//! - **Storage Abstraction**: Traits so the domain never sees a concrete backend
//! - **Connection Management**: Pool setup and schema creation on startup

pub mod objects;
pub mod sqlite;
pub mod traits;

pub use objects::{FsObjectStore, ObjectStore};
pub use sqlite::{DbConnection, GuardianRepository, RegistrantRepository};
pub use traits::{GuardianStorage, RegistrantStorage};
