//! Evaluations: the record model, scoring aggregates, completion rules, lifecycle, and
//! dashboard statistics. Everything here except `handlers` is pure and synchronous.

pub mod aggregate;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod stats;
pub mod validation;
