//! Congregation member model.

use async_graphql::{InputObject, SimpleObject};

/// A congregation member, owned by a usuario.
#[derive(Debug, Clone, SimpleObject)]
pub struct Miembro {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub edad: i32,
    pub email: String,
    pub fecha_bautizmo: String,
    pub ubicacion: String,
    pub telefono: i64,
    pub estado: Option<String>,
    pub usuario_id: String,
}

/// Input for creating a new miembro.
#[derive(Debug, Clone, InputObject)]
pub struct CrearMiembroInput {
    pub nombre: String,
    pub apellido: String,
    pub edad: i32,
    /// Must be unique across all miembros.
    pub email: String,
    /// Defaults to the current time when omitted.
    pub fecha_bautizmo: Option<String>,
    pub ubicacion: String,
    pub telefono: i64,
    pub estado: Option<String>,
    /// Must reference an existing usuario.
    pub usuario_id: String,
}

/// Partial input for updating a miembro. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ActualizarMiembroInput {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub edad: Option<i32>,
    pub email: Option<String>,
    pub fecha_bautizmo: Option<String>,
    pub ubicacion: Option<String>,
    pub telefono: Option<i64>,
    pub estado: Option<String>,
    pub usuario_id: Option<String>,
}
