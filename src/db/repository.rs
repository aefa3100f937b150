//! Validation and merge engine for all entity operations.
//!
//! Creation validates referential integrity and uniqueness before a single
//! insert. Updates are sparse merges: only the fields supplied in the input
//! overwrite stored state, and the store write is scoped to exactly those
//! fields.

use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{Bson, Document};

use crate::db::store::{CollectionStore, MIEMBROS, NOTIFICACIONES, USUARIOS};
use crate::errors::AppError;
use crate::models::{
    ActualizarMiembroInput, ActualizarNotificacionInput, ActualizarUsuarioInput, CrearMiembroInput,
    CrearNotificacionInput, CrearUsuarioInput, Miembro, Notificacion, Usuario,
};

/// Engine for all data operations, generic over the store gateway.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn CollectionStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    // ==================== USUARIO OPERATIONS ====================

    /// List all usuarios, in store-native order.
    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, AppError> {
        let docs = self.store.get_all(USUARIOS).await?;
        Ok(docs
            .into_iter()
            .map(|(id, doc)| usuario_from_doc(id, &doc))
            .collect())
    }

    /// Get a usuario by id.
    pub async fn get_usuario(&self, id: &str) -> Result<Option<Usuario>, AppError> {
        let doc = self.store.get_by_id(USUARIOS, id).await?;
        Ok(doc.map(|d| usuario_from_doc(id.to_string(), &d)))
    }

    /// Create a new usuario. The correo must not already be registered.
    pub async fn create_usuario(&self, input: &CrearUsuarioInput) -> Result<Usuario, AppError> {
        let existing = self.store.find_eq(USUARIOS, "correo", &input.correo).await?;
        if !existing.is_empty() {
            return Err(AppError::Duplicate("Correo ya registrado".to_string()));
        }

        let fecha = input.fecha_registro.clone().unwrap_or_else(now_iso);

        let mut doc = Document::new();
        doc.insert("username", input.username.clone());
        doc.insert("correo", input.correo.clone());
        doc.insert("password", input.password.clone());
        doc.insert("fecha_registro", fecha.clone());

        let id = self.store.insert(USUARIOS, doc).await?;

        Ok(Usuario {
            id,
            username: input.username.clone(),
            correo: input.correo.clone(),
            fecha_registro: fecha,
        })
    }

    /// Sparse-merge update of a usuario.
    pub async fn update_usuario(
        &self,
        id: &str,
        input: &ActualizarUsuarioInput,
    ) -> Result<Usuario, AppError> {
        let mut existing = self
            .store
            .get_by_id(USUARIOS, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let changes = usuario_changes(input);
        if changes.is_empty() {
            return Ok(usuario_from_doc(id.to_string(), &existing));
        }

        self.store.update_by_id(USUARIOS, id, changes.clone()).await?;

        for (key, value) in changes {
            existing.insert(key, value);
        }
        Ok(usuario_from_doc(id.to_string(), &existing))
    }

    /// Delete a usuario. Returns false when no document exists at the id.
    pub async fn delete_usuario(&self, id: &str) -> Result<bool, AppError> {
        if self.store.get_by_id(USUARIOS, id).await?.is_none() {
            return Ok(false);
        }
        self.store.delete_by_id(USUARIOS, id).await?;
        Ok(true)
    }

    // ==================== MIEMBRO OPERATIONS ====================

    /// List all miembros, in store-native order.
    pub async fn list_miembros(&self) -> Result<Vec<Miembro>, AppError> {
        let docs = self.store.get_all(MIEMBROS).await?;
        Ok(docs
            .into_iter()
            .map(|(id, doc)| miembro_from_doc(id, &doc))
            .collect())
    }

    /// Get a miembro by id.
    pub async fn get_miembro(&self, id: &str) -> Result<Option<Miembro>, AppError> {
        let doc = self.store.get_by_id(MIEMBROS, id).await?;
        Ok(doc.map(|d| miembro_from_doc(id.to_string(), &d)))
    }

    /// Create a new miembro. The owning usuario must exist and the email
    /// must not already be registered.
    pub async fn create_miembro(&self, input: &CrearMiembroInput) -> Result<Miembro, AppError> {
        if self
            .store
            .get_by_id(USUARIOS, &input.usuario_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        let existing = self.store.find_eq(MIEMBROS, "email", &input.email).await?;
        if !existing.is_empty() {
            return Err(AppError::Duplicate("Correo ya registrado".to_string()));
        }

        let fecha = input.fecha_bautizmo.clone().unwrap_or_else(now_iso);

        let mut doc = Document::new();
        doc.insert("nombre", input.nombre.clone());
        doc.insert("apellido", input.apellido.clone());
        doc.insert("edad", input.edad);
        doc.insert("fecha_bautizmo", fecha.clone());
        doc.insert("email", input.email.clone());
        doc.insert("ubicacion", input.ubicacion.clone());
        doc.insert("telefono", input.telefono);
        doc.insert("estado", input.estado.clone());
        doc.insert("usuario_id", input.usuario_id.clone());

        let id = self.store.insert(MIEMBROS, doc).await?;

        Ok(Miembro {
            id,
            nombre: input.nombre.clone(),
            apellido: input.apellido.clone(),
            edad: input.edad,
            email: input.email.clone(),
            fecha_bautizmo: fecha,
            ubicacion: input.ubicacion.clone(),
            telefono: input.telefono,
            estado: input.estado.clone(),
            usuario_id: input.usuario_id.clone(),
        })
    }

    /// Sparse-merge update of a miembro. The new usuario_id, if any, is not
    /// re-validated against the usuarios collection.
    pub async fn update_miembro(
        &self,
        id: &str,
        input: &ActualizarMiembroInput,
    ) -> Result<Miembro, AppError> {
        let mut existing = self
            .store
            .get_by_id(MIEMBROS, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Miembro no encontrado".to_string()))?;

        let changes = miembro_changes(input);
        if changes.is_empty() {
            return Ok(miembro_from_doc(id.to_string(), &existing));
        }

        self.store.update_by_id(MIEMBROS, id, changes.clone()).await?;

        for (key, value) in changes {
            existing.insert(key, value);
        }
        Ok(miembro_from_doc(id.to_string(), &existing))
    }

    /// Delete a miembro. Returns false when no document exists at the id.
    pub async fn delete_miembro(&self, id: &str) -> Result<bool, AppError> {
        if self.store.get_by_id(MIEMBROS, id).await?.is_none() {
            return Ok(false);
        }
        self.store.delete_by_id(MIEMBROS, id).await?;
        Ok(true)
    }

    // ==================== NOTIFICACION OPERATIONS ====================

    /// List all notificaciones, in store-native order.
    pub async fn list_notificaciones(&self) -> Result<Vec<Notificacion>, AppError> {
        let docs = self.store.get_all(NOTIFICACIONES).await?;
        Ok(docs
            .into_iter()
            .map(|(id, doc)| notificacion_from_doc(id, &doc))
            .collect())
    }

    /// Get a notificacion by id.
    pub async fn get_notificacion(&self, id: &str) -> Result<Option<Notificacion>, AppError> {
        let doc = self.store.get_by_id(NOTIFICACIONES, id).await?;
        Ok(doc.map(|d| notificacion_from_doc(id.to_string(), &d)))
    }

    /// Create a new notificacion. The owning miembro must exist.
    pub async fn create_notificacion(
        &self,
        input: &CrearNotificacionInput,
    ) -> Result<Notificacion, AppError> {
        if self
            .store
            .get_by_id(MIEMBROS, &input.miembro_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Miembro no encontrado".to_string()));
        }

        let fecha = input.fecha_envio.clone().unwrap_or_else(now_iso);

        let mut doc = Document::new();
        doc.insert("mensaje", input.mensaje.clone());
        doc.insert("fecha_envio", fecha.clone());
        doc.insert("miembro_id", input.miembro_id.clone());

        let id = self.store.insert(NOTIFICACIONES, doc).await?;

        Ok(Notificacion {
            id,
            mensaje: input.mensaje.clone(),
            fecha_envio: fecha,
            miembro_id: input.miembro_id.clone(),
        })
    }

    /// Sparse-merge update of a notificacion. The new miembro_id, if any, is
    /// not re-validated against the miembros collection.
    pub async fn update_notificacion(
        &self,
        id: &str,
        input: &ActualizarNotificacionInput,
    ) -> Result<Notificacion, AppError> {
        let mut existing = self
            .store
            .get_by_id(NOTIFICACIONES, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notificación no encontrada".to_string()))?;

        let changes = notificacion_changes(input);
        if changes.is_empty() {
            return Ok(notificacion_from_doc(id.to_string(), &existing));
        }

        self.store
            .update_by_id(NOTIFICACIONES, id, changes.clone())
            .await?;

        for (key, value) in changes {
            existing.insert(key, value);
        }
        Ok(notificacion_from_doc(id.to_string(), &existing))
    }

    /// Delete a notificacion. Returns false when no document exists at the id.
    pub async fn delete_notificacion(&self, id: &str) -> Result<bool, AppError> {
        if self.store.get_by_id(NOTIFICACIONES, id).await?.is_none() {
            return Ok(false);
        }
        self.store.delete_by_id(NOTIFICACIONES, id).await?;
        Ok(true)
    }
}

// Helper functions for partial-update documents and document conversion.

/// Current time as an ISO-8601 string.
fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Fields of a sparse usuario update that were actually supplied.
fn usuario_changes(input: &ActualizarUsuarioInput) -> Document {
    let mut changes = Document::new();
    if let Some(username) = &input.username {
        changes.insert("username", username.clone());
    }
    if let Some(correo) = &input.correo {
        changes.insert("correo", correo.clone());
    }
    if let Some(password) = &input.password {
        changes.insert("password", password.clone());
    }
    if let Some(fecha) = &input.fecha_registro {
        changes.insert("fecha_registro", fecha.clone());
    }
    changes
}

/// Fields of a sparse miembro update that were actually supplied.
fn miembro_changes(input: &ActualizarMiembroInput) -> Document {
    let mut changes = Document::new();
    if let Some(nombre) = &input.nombre {
        changes.insert("nombre", nombre.clone());
    }
    if let Some(apellido) = &input.apellido {
        changes.insert("apellido", apellido.clone());
    }
    if let Some(edad) = input.edad {
        changes.insert("edad", edad);
    }
    if let Some(email) = &input.email {
        changes.insert("email", email.clone());
    }
    if let Some(fecha) = &input.fecha_bautizmo {
        changes.insert("fecha_bautizmo", fecha.clone());
    }
    if let Some(ubicacion) = &input.ubicacion {
        changes.insert("ubicacion", ubicacion.clone());
    }
    if let Some(telefono) = input.telefono {
        changes.insert("telefono", telefono);
    }
    if let Some(estado) = &input.estado {
        changes.insert("estado", estado.clone());
    }
    if let Some(usuario_id) = &input.usuario_id {
        changes.insert("usuario_id", usuario_id.clone());
    }
    changes
}

/// Fields of a sparse notificacion update that were actually supplied.
fn notificacion_changes(input: &ActualizarNotificacionInput) -> Document {
    let mut changes = Document::new();
    if let Some(mensaje) = &input.mensaje {
        changes.insert("mensaje", mensaje.clone());
    }
    if let Some(fecha) = &input.fecha_envio {
        changes.insert("fecha_envio", fecha.clone());
    }
    if let Some(miembro_id) = &input.miembro_id {
        changes.insert("miembro_id", miembro_id.clone());
    }
    changes
}

fn usuario_from_doc(id: String, doc: &Document) -> Usuario {
    Usuario {
        id,
        username: doc_string(doc, "username"),
        correo: doc_string(doc, "correo"),
        fecha_registro: doc_string(doc, "fecha_registro"),
    }
}

fn miembro_from_doc(id: String, doc: &Document) -> Miembro {
    Miembro {
        id,
        nombre: doc_string(doc, "nombre"),
        apellido: doc_string(doc, "apellido"),
        edad: doc_i64(doc, "edad") as i32,
        email: doc_string(doc, "email"),
        fecha_bautizmo: doc_string(doc, "fecha_bautizmo"),
        ubicacion: doc_string(doc, "ubicacion"),
        telefono: doc_i64(doc, "telefono"),
        estado: doc.get_str("estado").ok().map(|s| s.to_string()),
        usuario_id: doc_string(doc, "usuario_id"),
    }
}

fn notificacion_from_doc(id: String, doc: &Document) -> Notificacion {
    Notificacion {
        id,
        mensaje: doc_string(doc, "mensaje"),
        fecha_envio: doc_string(doc, "fecha_envio"),
        miembro_id: doc_string(doc, "miembro_id"),
    }
}

fn doc_string(doc: &Document, key: &str) -> String {
    doc.get_str(key).unwrap_or_default().to_string()
}

/// Numeric fields may come back at either BSON integer width.
fn doc_i64(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::memory::MemoryStore;

    fn engine() -> (Repository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Repository::new(store.clone()), store)
    }

    fn usuario_input(username: &str, correo: &str) -> CrearUsuarioInput {
        CrearUsuarioInput {
            username: username.to_string(),
            correo: correo.to_string(),
            password: None,
            fecha_registro: None,
        }
    }

    #[test]
    fn test_usuario_changes_empty_input() {
        let changes = usuario_changes(&ActualizarUsuarioInput::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_usuario_changes_only_supplied_fields() {
        let input = ActualizarUsuarioInput {
            username: Some("nuevo".to_string()),
            ..Default::default()
        };
        let changes = usuario_changes(&input);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get_str("username").unwrap(), "nuevo");
    }

    #[test]
    fn test_miembro_changes_mixed_types() {
        let input = ActualizarMiembroInput {
            edad: Some(31),
            telefono: Some(987654321),
            estado: Some("activo".to_string()),
            ..Default::default()
        };
        let changes = miembro_changes(&input);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes.get_i32("edad").unwrap(), 31);
        assert_eq!(changes.get_i64("telefono").unwrap(), 987654321);
    }

    #[test]
    fn test_miembro_from_doc_handles_integer_widths() {
        let mut doc = Document::new();
        doc.insert("nombre", "Ana");
        doc.insert("edad", Bson::Int64(28));
        doc.insert("telefono", Bson::Int32(12345));

        let miembro = miembro_from_doc("abc".to_string(), &doc);
        assert_eq!(miembro.edad, 28);
        assert_eq!(miembro.telefono, 12345);
        assert_eq!(miembro.estado, None);
    }

    #[tokio::test]
    async fn test_create_usuario_defaults_fecha() {
        let (repo, _) = engine();

        let usuario = repo.create_usuario(&usuario_input("ana", "ana@x.com")).await.unwrap();

        assert!(!usuario.id.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&usuario.fecha_registro).is_ok());
    }

    #[tokio::test]
    async fn test_create_usuario_keeps_supplied_fecha() {
        let (repo, _) = engine();

        let mut input = usuario_input("ana", "ana@x.com");
        input.fecha_registro = Some("2020-01-01T00:00:00+00:00".to_string());

        let usuario = repo.create_usuario(&input).await.unwrap();
        assert_eq!(usuario.fecha_registro, "2020-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_create_usuario_rejects_duplicate_correo() {
        let (repo, _) = engine();

        repo.create_usuario(&usuario_input("ana", "ana@x.com")).await.unwrap();
        let err = repo
            .create_usuario(&usuario_input("ana2", "ana@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Duplicate(_)));
        assert_eq!(err.message(), "Correo ya registrado");
    }

    #[tokio::test]
    async fn test_create_miembro_requires_existing_usuario() {
        let (repo, store) = engine();

        let input = CrearMiembroInput {
            nombre: "Juan".to_string(),
            apellido: "Pérez".to_string(),
            edad: 30,
            email: "juan@x.com".to_string(),
            fecha_bautizmo: None,
            ubicacion: "Quito".to_string(),
            telefono: 987654321,
            estado: None,
            usuario_id: "000000000000000000000000".to_string(),
        };
        let err = repo.create_miembro(&input).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Usuario no encontrado");
        // Nothing was inserted
        assert!(store.get_all(MIEMBROS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_update_performs_no_write() {
        let (repo, store) = engine();

        let usuario = repo.create_usuario(&usuario_input("ana", "ana@x.com")).await.unwrap();
        let writes_before = store.write_count();

        let unchanged = repo
            .update_usuario(&usuario.id, &ActualizarUsuarioInput::default())
            .await
            .unwrap();

        assert_eq!(store.write_count(), writes_before);
        assert_eq!(unchanged.username, usuario.username);
        assert_eq!(unchanged.correo, usuario.correo);
        assert_eq!(unchanged.fecha_registro, usuario.fecha_registro);
    }

    #[tokio::test]
    async fn test_update_merges_sparsely() {
        let (repo, _) = engine();

        let usuario = repo.create_usuario(&usuario_input("ana", "ana@x.com")).await.unwrap();

        let input = ActualizarUsuarioInput {
            username: Some("ana_nueva".to_string()),
            ..Default::default()
        };
        let updated = repo.update_usuario(&usuario.id, &input).await.unwrap();

        assert_eq!(updated.username, "ana_nueva");
        assert_eq!(updated.correo, "ana@x.com");
        assert_eq!(updated.fecha_registro, usuario.fecha_registro);

        // And the merge is persisted, not just echoed back
        let fetched = repo.get_usuario(&usuario.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "ana_nueva");
        assert_eq!(fetched.correo, "ana@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_usuario_is_not_found() {
        let (repo, _) = engine();

        let err = repo
            .update_usuario("000000000000000000000000", &ActualizarUsuarioInput::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let (repo, _) = engine();

        let usuario = repo.create_usuario(&usuario_input("ana", "ana@x.com")).await.unwrap();

        assert!(repo.delete_usuario(&usuario.id).await.unwrap());
        assert!(repo.get_usuario(&usuario.id).await.unwrap().is_none());
        assert!(!repo.delete_usuario(&usuario.id).await.unwrap());
    }
}
