//! # JSON File Store
//!
//! Keeps every cliente in a single pretty-printed JSON array on disk.
//!
//! Each operation reads the whole file, works on the in-memory list and, when
//! something changed, rewrites the whole file. This is only reasonable for
//! small collections. Cycles are serialised by an async mutex so requests
//! within one process never interleave their read-modify-write; nothing
//! protects the file against a second process writing it concurrently, and a
//! crash mid-write can lose the file contents.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::{Cliente, ClienteQuery, ClienteUpdate, NewCliente};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::traits::ClienteStorage;
use crate::domain::validation::build_cliente;

/// File-backed cliente store
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole collection, creating an empty one if the file is missing
    async fn read_clientes(&self) -> StoreResult<Vec<Cliente>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No clientes file at {}, creating an empty one", self.path.display());
                self.write_clientes(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the file with the given collection
    async fn write_clientes(&self, clientes: &[Cliente]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(clientes)?;
        fs::write(&self.path, content).await?;

        debug!("Wrote {} clientes to {}", clientes.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ClienteStorage for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "file system"
    }

    async fn create(&self, data: NewCliente) -> StoreResult<Cliente> {
        let _guard = self.lock.lock().await;
        let mut clientes = self.read_clientes().await?;

        let cliente = build_cliente(data, &clientes)?;
        clientes.push(cliente.clone());
        self.write_clientes(&clientes).await?;

        info!("Created cliente {} (dni {})", cliente.id, cliente.dni);
        Ok(cliente)
    }

    async fn read_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>> {
        let _guard = self.lock.lock().await;
        let clientes = self.read_clientes().await?;

        Ok(clientes.into_iter().find(|c| query.matches(c)))
    }

    async fn read_many(&self, query: &ClienteQuery) -> StoreResult<Vec<Cliente>> {
        let _guard = self.lock.lock().await;
        let clientes = self.read_clientes().await?;

        Ok(clientes.into_iter().filter(|c| query.matches(c)).collect())
    }

    async fn update_one(
        &self,
        query: &ClienteQuery,
        data: &ClienteUpdate,
    ) -> StoreResult<Option<Cliente>> {
        let _guard = self.lock.lock().await;
        let mut clientes = self.read_clientes().await?;

        let Some(cliente) = clientes.iter_mut().find(|c| query.matches(c)) else {
            return Ok(None);
        };
        data.apply_to(cliente);
        let updated = cliente.clone();

        self.write_clientes(&clientes).await?;

        info!("Updated cliente {}", updated.id);
        Ok(Some(updated))
    }

    async fn update_many(&self, query: &ClienteQuery, data: &ClienteUpdate) -> StoreResult<u64> {
        let _guard = self.lock.lock().await;
        let mut clientes = self.read_clientes().await?;

        let mut updated_count = 0u64;
        for cliente in clientes.iter_mut().filter(|c| query.matches(c)) {
            data.apply_to(cliente);
            updated_count += 1;
        }

        if updated_count > 0 {
            self.write_clientes(&clientes).await?;
        }

        info!("Updated {} clientes", updated_count);
        Ok(updated_count)
    }

    async fn delete_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>> {
        let _guard = self.lock.lock().await;
        let mut clientes = self.read_clientes().await?;

        let Some(index) = clientes.iter().position(|c| query.matches(c)) else {
            return Ok(None);
        };
        let removed = clientes.remove(index);

        self.write_clientes(&clientes).await?;

        info!("Deleted cliente {}", removed.id);
        Ok(Some(removed))
    }

    async fn delete_many(&self, query: &ClienteQuery) -> StoreResult<u64> {
        let _guard = self.lock.lock().await;
        let mut clientes = self.read_clientes().await?;

        let initial_len = clientes.len();
        clientes.retain(|c| !query.matches(c));
        let deleted_count = (initial_len - clientes.len()) as u64;

        if deleted_count > 0 {
            self.write_clientes(&clientes).await?;
        }

        info!("Deleted {} clientes", deleted_count);
        Ok(deleted_count)
    }

    async fn read_all(&self) -> StoreResult<Vec<Cliente>> {
        let _guard = self.lock.lock().await;
        self.read_clientes().await
    }

    async fn read_by_id(&self, id: &str) -> StoreResult<Cliente> {
        let _guard = self.lock.lock().await;
        let clientes = self.read_clientes().await?;

        clientes
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ValidationError;
    use crate::storage::test_utils::{ana, sample_new_cliente, TestEnvironment};

    fn store_in(env: &TestEnvironment) -> JsonFileStore {
        JsonFileStore::new(env.json_path())
    }

    #[tokio::test]
    async fn test_missing_file_bootstraps_empty_collection() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        assert!(!store.path().exists());

        let clientes = store.read_all().await.unwrap();

        assert!(clientes.is_empty());
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[tokio::test]
    async fn test_create_then_read_by_id() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);

        let created = store.create(ana()).await.unwrap();
        let fetched = store.read_by_id(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.nombre, "Ana");
        assert_eq!(fetched.e_civil.as_deref(), Some("soltera"));
        assert_eq!(fetched.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_created_record_is_found_by_dni() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);

        let created = store.create(ana()).await.unwrap();
        let found = store.read_one(&ClienteQuery::by_dni(123)).await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_dni_is_a_validation_error() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(sample_new_cliente(123)).await.unwrap();

        let result = store.create(sample_new_cliente(123)).await;

        assert!(matches!(
            result,
            Err(StoreError::Validation(ValidationError::DuplicateDni(123)))
        ));
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_mail_is_a_validation_error() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        let mut data = ana();
        data.mail = Some("not-an-email".to_string());

        let result = store.create(data).await;

        assert!(matches!(
            result,
            Err(StoreError::Validation(ValidationError::InvalidMail(_)))
        ));
    }

    #[tokio::test]
    async fn test_read_by_unknown_id_is_not_found() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);

        let result = store.read_by_id("missing").await;

        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_read_many_filters_by_every_field() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(sample_new_cliente(1)).await.unwrap();
        let mut other = sample_new_cliente(2);
        other.apellido = Some("Gomez".to_string());
        store.create(other).await.unwrap();
        store.create(sample_new_cliente(3)).await.unwrap();

        let query = ClienteQuery {
            apellido: Some("Perez".to_string()),
            ..ClienteQuery::default()
        };
        let found = store.read_many(&query).await.unwrap();

        let dnis: Vec<i64> = found.iter().map(|c| c.dni).collect();
        assert_eq!(dnis, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_one_merges_only_given_fields() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        let created = store.create(ana()).await.unwrap();

        let update = ClienteUpdate {
            telefono: Some(789),
            ..ClienteUpdate::default()
        };
        let updated = store
            .update_one(&ClienteQuery::by_dni(123), &update)
            .await
            .unwrap()
            .expect("record should match");

        let mut expected = created.clone();
        expected.telefono = 789;
        assert_eq!(updated, expected);
        assert_eq!(store.read_by_id(&created.id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_update_one_without_match_returns_none() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(ana()).await.unwrap();

        let update = ClienteUpdate {
            telefono: Some(789),
            ..ClienteUpdate::default()
        };
        let result = store.update_one(&ClienteQuery::by_dni(999), &update).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_skips_creation_rules() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(ana()).await.unwrap();

        let update = ClienteUpdate {
            mail: Some("not-an-email".to_string()),
            ..ClienteUpdate::default()
        };
        let updated = store
            .update_one(&ClienteQuery::by_dni(123), &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.mail, "not-an-email");
    }

    #[tokio::test]
    async fn test_update_many_counts_matches() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        for dni in 1..=3 {
            store.create(sample_new_cliente(dni)).await.unwrap();
        }

        let update = ClienteUpdate {
            domicilio: Some("Calle Nueva 10".to_string()),
            ..ClienteUpdate::default()
        };
        let count = store.update_many(&ClienteQuery::default(), &update).await.unwrap();

        assert_eq!(count, 3);
        let clientes = store.read_all().await.unwrap();
        assert!(clientes.iter().all(|c| c.domicilio == "Calle Nueva 10"));
    }

    #[tokio::test]
    async fn test_update_many_without_match_leaves_file_untouched() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(ana()).await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let update = ClienteUpdate {
            nombre: Some("Eva".to_string()),
            ..ClienteUpdate::default()
        };
        let count = store.update_many(&ClienteQuery::by_dni(5), &update).await.unwrap();

        assert_eq!(count, 0);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_one_twice() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        let created = store.create(ana()).await.unwrap();
        let query = ClienteQuery::by_dni(123);

        let removed = store.delete_one(&query).await.unwrap();
        assert_eq!(removed, Some(created));

        let again = store.delete_one(&query).await.unwrap();
        assert!(again.is_none());
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_returns_count() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        for dni in 1..=4 {
            store.create(sample_new_cliente(dni)).await.unwrap();
        }

        let query = ClienteQuery {
            apellido: Some("Perez".to_string()),
            ..ClienteQuery::default()
        };
        assert_eq!(store.delete_many(&query).await.unwrap(), 4);
        assert_eq!(store.delete_many(&query).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_records_survive_reopening_in_order() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        let mut created = Vec::new();
        for dni in [30, 10, 20] {
            created.push(store.create(sample_new_cliente(dni)).await.unwrap());
        }
        drop(store);

        let reopened = store_in(&env);
        let clientes = reopened.read_all().await.unwrap();

        assert_eq!(clientes, created);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_with_two_spaces() {
        let env = TestEnvironment::new().unwrap();
        let store = store_in(&env);
        store.create(ana()).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();

        assert!(content.starts_with("[\n  {\n    \"id\": "));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let env = TestEnvironment::new().unwrap();
        let path = env.json_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        let store = store_in(&env);

        let result = store.read_all().await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let env = TestEnvironment::new().unwrap();
        let store = std::sync::Arc::new(store_in(&env));

        let handles: Vec<_> = (1..=10)
            .map(|dni| {
                let store = store.clone();
                tokio::spawn(async move { store.create(sample_new_cliente(dni)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.read_all().await.unwrap().len(), 10);
    }
}
