// utils
pub mod error;
pub mod xml;

// soap 1.1
pub mod envelope;
