//! Flutter bridge for the Daylog core.

pub mod api;
