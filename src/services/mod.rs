//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! The code services work against the `CodeStore` trait; the settings
//! service queries the pool directly.

pub mod code_generator;
pub mod grant_service;
pub mod redemption;
pub mod settings_service;
