//! Repository modules for database operations.

mod booking;
mod cart;
mod category;
mod dashboard;
mod event;
mod ticket;
mod user;

pub use booking::{BookingRepository, ConfirmError};
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use dashboard::DashboardRepository;
pub use event::{EventPage, EventRepository, EventWrite, EVENTS_PER_PAGE};
pub use ticket::TicketRepository;
pub use user::{DuplicateField, UserRepository};
