pub mod auth;
pub mod cart;
pub mod events;
pub mod health;
pub mod organizer;
pub mod payments;
