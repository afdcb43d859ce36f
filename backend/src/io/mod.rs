//! # IO Module
//!
//! Provides the interface layer between callers and the domain logic.
//!
//! This module serves as the adapter layer that translates HTTP requests
//! into domain operations and formats domain responses for consumption. It
//! handles the communication protocol (REST API), serialization, and
//! maintains the boundary between the interface and business logic.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Exposing REST API endpoints for the frontend and scanners
//! - **Actor Construction**: Reading the identity headers set by the auth layer
//! - **Data Serialization**: Converting between JSON and domain objects
//! - **Error Translation**: Converting domain errors to appropriate HTTP status codes
//! - **CORS Management**: Handling cross-origin requests for web frontends

pub mod rest;

pub use rest::*;
