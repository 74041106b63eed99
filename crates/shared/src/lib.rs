//! Shared utilities used across the EventHive workspace.

pub mod crypto;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod validation;
