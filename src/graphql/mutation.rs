//! Mutation resolvers.
//!
//! Resolvers only marshal arguments and delegate to the repository; engine
//! errors surface as GraphQL errors.

use async_graphql::{Context, Object, Result};

use crate::db::Repository;
use crate::models::{
    ActualizarMiembroInput, ActualizarNotificacionInput, ActualizarUsuarioInput, CrearMiembroInput,
    CrearNotificacionInput, CrearUsuarioInput, Miembro, Notificacion, Usuario,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new usuario; the correo must be unique.
    async fn crear_usuario(
        &self,
        ctx: &Context<'_>,
        usuario: CrearUsuarioInput,
    ) -> Result<Usuario> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.create_usuario(&usuario).await?)
    }

    /// Partially update a usuario; omitted fields keep their stored values.
    async fn actualizar_usuario(
        &self,
        ctx: &Context<'_>,
        id: String,
        usuario: ActualizarUsuarioInput,
    ) -> Result<Option<Usuario>> {
        let repo = ctx.data::<Repository>()?;
        Ok(Some(repo.update_usuario(&id, &usuario).await?))
    }

    /// Delete a usuario. Returns false when the id does not exist.
    async fn eliminar_usuario(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.delete_usuario(&id).await?)
    }

    /// Create a new miembro owned by an existing usuario.
    async fn crear_miembro(
        &self,
        ctx: &Context<'_>,
        miembro: CrearMiembroInput,
    ) -> Result<Miembro> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.create_miembro(&miembro).await?)
    }

    /// Partially update a miembro; omitted fields keep their stored values.
    async fn actualizar_miembro(
        &self,
        ctx: &Context<'_>,
        id: String,
        miembro: ActualizarMiembroInput,
    ) -> Result<Option<Miembro>> {
        let repo = ctx.data::<Repository>()?;
        Ok(Some(repo.update_miembro(&id, &miembro).await?))
    }

    /// Delete a miembro. Returns false when the id does not exist.
    async fn eliminar_miembro(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.delete_miembro(&id).await?)
    }

    /// Create a new notificacion addressed to an existing miembro.
    async fn crear_notificacion(
        &self,
        ctx: &Context<'_>,
        notificacion: CrearNotificacionInput,
    ) -> Result<Notificacion> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.create_notificacion(&notificacion).await?)
    }

    /// Partially update a notificacion; omitted fields keep their stored
    /// values.
    async fn actualizar_notificacion(
        &self,
        ctx: &Context<'_>,
        id: String,
        notificacion: ActualizarNotificacionInput,
    ) -> Result<Option<Notificacion>> {
        let repo = ctx.data::<Repository>()?;
        Ok(Some(repo.update_notificacion(&id, &notificacion).await?))
    }

    /// Delete a notificacion. Returns false when the id does not exist.
    async fn eliminar_notificacion(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.delete_notificacion(&id).await?)
    }
}
