//! Notification model.

use async_graphql::{InputObject, SimpleObject};

/// A notification sent to a miembro.
#[derive(Debug, Clone, SimpleObject)]
pub struct Notificacion {
    pub id: String,
    pub mensaje: String,
    pub fecha_envio: String,
    pub miembro_id: String,
}

/// Input for creating a new notificacion.
#[derive(Debug, Clone, InputObject)]
pub struct CrearNotificacionInput {
    pub mensaje: String,
    /// Defaults to the current time when omitted.
    pub fecha_envio: Option<String>,
    /// Must reference an existing miembro.
    pub miembro_id: String,
}

/// Partial input for updating a notificacion. Omitted fields are left
/// untouched.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ActualizarNotificacionInput {
    pub mensaje: Option<String>,
    pub fecha_envio: Option<String>,
    pub miembro_id: Option<String>,
}
