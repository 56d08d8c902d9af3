//! Rule catalogs, one module per vulnerability class
//!
//! Each module exposes its rule table and a `scanner()` constructor
//! returning the configured [`crate::RuleEngine`]. Rule ids are stable and
//! explicitly assigned per entry.

pub mod csrf;
pub mod idor;
pub mod injection;
pub mod misconfig;
pub mod secrets;
pub mod session;
pub mod xss;
