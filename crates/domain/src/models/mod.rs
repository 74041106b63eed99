//! Domain model modules.

pub mod booking;
pub mod cart;
pub mod category;
pub mod dashboard;
pub mod event;
pub mod ticket;
pub mod user;

pub use booking::{Attendee, Booking, BookingSummary, Gender, PaymentStatus};
pub use cart::{AttendeeRecord, BookingCart, CartError, TicketSelection};
pub use category::Category;
pub use dashboard::{EventCounts, OrganizerDashboard};
pub use event::{Event, EventFilter, EventStatus, EventType};
pub use ticket::{Ticket, TicketType};
pub use user::User;
