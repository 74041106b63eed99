//! Database row mappings.

mod booking;
mod cart;
mod category;
mod event;
mod ticket;
mod user;

pub use booking::{AttendeeEntity, BookingEntity, BookingRow};
pub use cart::CartEntity;
pub use category::CategoryEntity;
pub use event::EventEntity;
pub use ticket::TicketEntity;
pub use user::{UserEntity, UserSessionEntity};
