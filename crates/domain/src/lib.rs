//! Domain models for the EventHive ticketing platform.

pub mod models;
