pub mod auth;
pub mod email;
pub mod payment;

pub use auth::AuthService;
pub use email::EmailService;
pub use payment::{PaymentGateway, PaymentOrder, RestPaymentGateway};
