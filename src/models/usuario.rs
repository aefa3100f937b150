//! User account model.

use async_graphql::{InputObject, SimpleObject};

/// A registered user account.
///
/// The stored document also carries a `password` field; it is accepted on
/// creation and update but never exposed through the API.
#[derive(Debug, Clone, SimpleObject)]
pub struct Usuario {
    pub id: String,
    pub username: String,
    pub correo: String,
    pub fecha_registro: String,
}

/// Input for creating a new usuario.
#[derive(Debug, Clone, InputObject)]
pub struct CrearUsuarioInput {
    pub username: String,
    /// Must be unique across all usuarios.
    pub correo: String,
    pub password: Option<String>,
    /// Defaults to the current time when omitted.
    pub fecha_registro: Option<String>,
}

/// Partial input for updating a usuario. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ActualizarUsuarioInput {
    pub username: Option<String>,
    pub correo: Option<String>,
    pub password: Option<String>,
    pub fecha_registro: Option<String>,
}
