//! Core types for Apotheca.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod money;
pub mod payment;
pub mod phone;
pub mod role;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Money};
pub use payment::{PaymentMethod, PaymentMethodError};
pub use phone::{Phone, PhoneError};
pub use role::{Role, RoleError};
