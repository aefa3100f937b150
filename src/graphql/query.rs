//! Query resolvers.
//!
//! Resolvers only marshal arguments and delegate to the repository.

use async_graphql::{Context, Object, Result};

use crate::db::Repository;
use crate::models::{Miembro, Notificacion, Usuario};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All registered usuarios.
    async fn usuarios(&self, ctx: &Context<'_>) -> Result<Vec<Usuario>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.list_usuarios().await?)
    }

    /// A single usuario by id.
    async fn usuario(&self, ctx: &Context<'_>, id: String) -> Result<Option<Usuario>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.get_usuario(&id).await?)
    }

    /// All congregation miembros.
    async fn miembros(&self, ctx: &Context<'_>) -> Result<Vec<Miembro>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.list_miembros().await?)
    }

    /// A single miembro by id.
    async fn miembro(&self, ctx: &Context<'_>, id: String) -> Result<Option<Miembro>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.get_miembro(&id).await?)
    }

    /// All notificaciones.
    async fn notificaciones(&self, ctx: &Context<'_>) -> Result<Vec<Notificacion>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.list_notificaciones().await?)
    }

    /// A single notificacion by id.
    async fn notificacion(&self, ctx: &Context<'_>, id: String) -> Result<Option<Notificacion>> {
        let repo = ctx.data::<Repository>()?;
        Ok(repo.get_notificacion(&id).await?)
    }
}
