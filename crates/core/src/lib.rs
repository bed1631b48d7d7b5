//! Domain logic for the staff rota platform.
//!
//! This crate is pure: no I/O, no database, no HTTP. It owns the weekly
//! schedule data model, time arithmetic, hour aggregation, the template
//! collection, and the presentation-ready export projection. Persistence is
//! abstracted behind [`document::PersistenceGateway`] so the API layer can
//! inject any store that speaks the document shape.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod export;
pub mod schedule;
pub mod template;
pub mod time;
pub mod types;
