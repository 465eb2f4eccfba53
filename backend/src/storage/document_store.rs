//! # Document Store
//!
//! Clientes kept in the `Clientes` collection of a SQLite database through
//! sqlx. The collection declares its shape: column types are enforced with a
//! `STRICT` table, required fields are `NOT NULL` and not blank, and `id`,
//! `dni`, `mail` and `userID` are unique. Writes that break the shape are
//! refused by the database itself; no record validation happens here.
//!
//! The pool is opened lazily by the first operation and kept for the life of
//! the store. There is no reconnect or health check.

use std::str::FromStr;

use async_trait::async_trait;
use shared::{Cliente, ClienteQuery, ClienteUpdate, NewCliente};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::error::{StoreError, StoreResult};
use super::traits::ClienteStorage;
use crate::domain::validation::assign_id;

/// Name of the collection holding the clientes
pub const COLLECTION: &str = "Clientes";

const SELECT_CLIENTES: &str = r#"
    SELECT id, nombre, apellido, dni, telefono, mail, domicilio,
           nacimiento, e_civil, user_id, inventario
    FROM Clientes"#;

/// Collection-backed cliente store
pub struct DocumentStore {
    url: String,
    pool: OnceCell<SqlitePool>,
}

impl DocumentStore {
    /// Create a store for the given connection string without connecting
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: OnceCell::new(),
        }
    }

    /// Whether the connection has been established
    pub fn is_connected(&self) -> bool {
        self.pool.get().is_some()
    }

    /// Get the pool, opening it and declaring the collection on first use
    async fn pool(&self) -> StoreResult<&SqlitePool> {
        self.pool
            .get_or_try_init(|| async {
                let options = SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true);
                let pool = SqlitePoolOptions::new().connect_with(options).await?;
                Self::setup_schema(&pool).await?;
                info!("Connected to document store");
                Ok::<_, StoreError>(pool)
            })
            .await
    }

    /// Declare the collection shape
    async fn setup_schema(pool: &SqlitePool) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS Clientes (
                id TEXT PRIMARY KEY NOT NULL,
                nombre TEXT NOT NULL CHECK (trim(nombre) <> ''),
                apellido TEXT NOT NULL CHECK (trim(apellido) <> ''),
                dni INTEGER NOT NULL UNIQUE,
                telefono INTEGER NOT NULL,
                mail TEXT NOT NULL UNIQUE CHECK (trim(mail) <> ''),
                domicilio TEXT NOT NULL CHECK (trim(domicilio) <> ''),
                nacimiento TEXT,
                e_civil TEXT,
                user_id TEXT UNIQUE,
                inventario TEXT NOT NULL DEFAULT '[]'
            ) STRICT;
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn fetch_by_id(&self, id: &str) -> StoreResult<Option<Cliente>> {
        let pool = self.pool().await?;
        let row = sqlx::query(&format!("{SELECT_CLIENTES} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(cliente_from_row).transpose()
    }
}

#[async_trait]
impl ClienteStorage for DocumentStore {
    fn backend_name(&self) -> &'static str {
        "document store"
    }

    async fn connect(&self) -> StoreResult<()> {
        self.pool().await.map(|_| ())
    }

    async fn disconnect(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Disconnected from document store");
        }
    }

    async fn create(&self, data: NewCliente) -> StoreResult<Cliente> {
        let pool = self.pool().await?;

        let id = assign_id(data.id);
        let inventario = serde_json::to_string(&data.inventario.unwrap_or_default())?;

        sqlx::query(
            r#"
            INSERT INTO Clientes
                (id, nombre, apellido, dni, telefono, mail, domicilio,
                 nacimiento, e_civil, user_id, inventario)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(data.nombre)
        .bind(data.apellido)
        .bind(data.dni)
        .bind(data.telefono)
        .bind(data.mail)
        .bind(data.domicilio)
        .bind(data.nacimiento)
        .bind(data.e_civil)
        .bind(data.user_id)
        .bind(inventario)
        .execute(pool)
        .await?;

        info!("Created cliente {}", id);
        self.fetch_by_id(&id).await?.ok_or(StoreError::NotFound)
    }

    async fn read_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>> {
        let pool = self.pool().await?;

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_CLIENTES);
        push_filter(&mut builder, query);
        builder.push(" ORDER BY rowid LIMIT 1");

        let row = builder.build().fetch_optional(pool).await?;
        row.as_ref().map(cliente_from_row).transpose()
    }

    async fn read_many(&self, query: &ClienteQuery) -> StoreResult<Vec<Cliente>> {
        let pool = self.pool().await?;

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_CLIENTES);
        push_filter(&mut builder, query);
        builder.push(" ORDER BY rowid");

        let rows = builder.build().fetch_all(pool).await?;
        debug!("Found {} clientes", rows.len());
        rows.iter().map(cliente_from_row).collect()
    }

    async fn update_one(
        &self,
        query: &ClienteQuery,
        data: &ClienteUpdate,
    ) -> StoreResult<Option<Cliente>> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        let mut select = QueryBuilder::<Sqlite>::new("SELECT id FROM Clientes");
        push_filter(&mut select, query);
        select.push(" ORDER BY rowid LIMIT 1");

        let Some(row) = select.build().fetch_optional(&mut *tx).await? else {
            warn!("No cliente matched the update");
            return Err(StoreError::NotFound);
        };
        let id: String = row.try_get("id")?;

        if !data.is_empty() {
            let mut update = QueryBuilder::<Sqlite>::new("UPDATE Clientes SET ");
            push_assignments(&mut update, data)?;
            update.push(" WHERE id = ").push_bind(id.clone());
            update.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!("Updated cliente {}", id);
        self.fetch_by_id(&id).await
    }

    async fn update_many(&self, query: &ClienteQuery, data: &ClienteUpdate) -> StoreResult<u64> {
        let pool = self.pool().await?;

        let count = if data.is_empty() {
            let mut select = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS matched FROM Clientes");
            push_filter(&mut select, query);
            let row = select.build().fetch_one(pool).await?;
            let matched: i64 = row.try_get("matched")?;
            matched as u64
        } else {
            let mut update = QueryBuilder::<Sqlite>::new("UPDATE Clientes SET ");
            push_assignments(&mut update, data)?;
            push_filter(&mut update, query);
            update.build().execute(pool).await?.rows_affected()
        };

        info!("Updated {} clientes", count);
        Ok(count)
    }

    async fn delete_one(&self, query: &ClienteQuery) -> StoreResult<Option<Cliente>> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_CLIENTES);
        push_filter(&mut select, query);
        select.push(" ORDER BY rowid LIMIT 1");

        let Some(row) = select.build().fetch_optional(&mut *tx).await? else {
            return Ok(None);
        };
        let cliente = cliente_from_row(&row)?;

        sqlx::query("DELETE FROM Clientes WHERE id = ?")
            .bind(&cliente.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Deleted cliente {}", cliente.id);
        Ok(Some(cliente))
    }

    async fn delete_many(&self, _query: &ClienteQuery) -> StoreResult<u64> {
        warn!("deleteMany is not available on the document store");
        Err(StoreError::NotImplemented("deleteMany"))
    }

    async fn read_all(&self) -> StoreResult<Vec<Cliente>> {
        self.read_many(&ClienteQuery::default()).await
    }

    async fn read_by_id(&self, id: &str) -> StoreResult<Cliente> {
        self.fetch_by_id(id).await?.ok_or(StoreError::NotFound)
    }
}

/// Append a `WHERE` clause with one equality per present query field
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, query: &ClienteQuery) {
    builder.push(" WHERE 1 = 1");

    if let Some(id) = &query.id {
        builder.push(" AND id = ").push_bind(id.clone());
    }
    if let Some(nombre) = &query.nombre {
        builder.push(" AND nombre = ").push_bind(nombre.clone());
    }
    if let Some(apellido) = &query.apellido {
        builder.push(" AND apellido = ").push_bind(apellido.clone());
    }
    if let Some(dni) = query.dni {
        builder.push(" AND dni = ").push_bind(dni);
    }
    if let Some(telefono) = query.telefono {
        builder.push(" AND telefono = ").push_bind(telefono);
    }
    if let Some(mail) = &query.mail {
        builder.push(" AND mail = ").push_bind(mail.clone());
    }
    if let Some(domicilio) = &query.domicilio {
        builder.push(" AND domicilio = ").push_bind(domicilio.clone());
    }
    if let Some(nacimiento) = query.nacimiento {
        builder.push(" AND nacimiento = ").push_bind(nacimiento);
    }
    if let Some(e_civil) = &query.e_civil {
        builder.push(" AND e_civil = ").push_bind(e_civil.clone());
    }
    if let Some(user_id) = &query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.clone());
    }
}

/// Append the `SET` list for every present update field
fn push_assignments(builder: &mut QueryBuilder<'_, Sqlite>, data: &ClienteUpdate) -> StoreResult<()> {
    let inventario = data
        .inventario
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let mut set = builder.separated(", ");
    if let Some(nombre) = &data.nombre {
        set.push("nombre = ").push_bind_unseparated(nombre.clone());
    }
    if let Some(apellido) = &data.apellido {
        set.push("apellido = ").push_bind_unseparated(apellido.clone());
    }
    if let Some(dni) = data.dni {
        set.push("dni = ").push_bind_unseparated(dni);
    }
    if let Some(telefono) = data.telefono {
        set.push("telefono = ").push_bind_unseparated(telefono);
    }
    if let Some(mail) = &data.mail {
        set.push("mail = ").push_bind_unseparated(mail.clone());
    }
    if let Some(domicilio) = &data.domicilio {
        set.push("domicilio = ").push_bind_unseparated(domicilio.clone());
    }
    if let Some(nacimiento) = data.nacimiento {
        set.push("nacimiento = ").push_bind_unseparated(nacimiento);
    }
    if let Some(e_civil) = &data.e_civil {
        set.push("e_civil = ").push_bind_unseparated(e_civil.clone());
    }
    if let Some(user_id) = &data.user_id {
        set.push("user_id = ").push_bind_unseparated(user_id.clone());
    }
    if let Some(inventario) = inventario {
        set.push("inventario = ").push_bind_unseparated(inventario);
    }

    Ok(())
}

fn cliente_from_row(row: &SqliteRow) -> StoreResult<Cliente> {
    let inventario: String = row.try_get("inventario")?;

    Ok(Cliente {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        apellido: row.try_get("apellido")?,
        dni: row.try_get("dni")?,
        telefono: row.try_get("telefono")?,
        mail: row.try_get("mail")?,
        domicilio: row.try_get("domicilio")?,
        nacimiento: row.try_get("nacimiento")?,
        e_civil: row.try_get("e_civil")?,
        user_id: row.try_get("user_id")?,
        inventario: serde_json::from_str(&inventario)?,
    })
}
