//! Fix-generation use cases

pub mod use_cases;
