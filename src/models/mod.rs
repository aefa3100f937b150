//! GraphQL data models for the congregation API.
//!
//! Field names keep the original Spanish collection schema so existing
//! clients continue to work unchanged.

mod miembro;
mod notificacion;
mod usuario;

pub use miembro::*;
pub use notificacion::*;
pub use usuario::*;
