//! Protocol implementations.
//!
//! - `echo`: newline-delimited echo service

pub mod echo;
