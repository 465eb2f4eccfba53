/// Test utilities shared by the storage and REST tests
///
/// `TestEnvironment` owns a temporary directory that is removed when the
/// environment is dropped, even if the test panics.
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use shared::NewCliente;
use tempfile::TempDir;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("clientes_test_")?;
        let base_path = temp_dir.path().to_path_buf();

        Ok(Self {
            _temp_dir: temp_dir,
            base_path,
        })
    }

    /// Location of the JSON collection; its parent directory does not exist yet
    pub fn json_path(&self) -> PathBuf {
        self.base_path.join("db").join("clientes.json")
    }

    /// Connection string for a fresh SQLite document store in this directory
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.base_path.join("clientes.db").display())
    }
}

/// The reference customer used throughout the tests
pub fn ana() -> NewCliente {
    NewCliente {
        id: None,
        nombre: Some("Ana".to_string()),
        apellido: Some("Diaz".to_string()),
        dni: Some(123),
        telefono: Some(456),
        mail: Some("a@b.com".to_string()),
        domicilio: Some("Calle 1".to_string()),
        nacimiento: NaiveDate::from_ymd_opt(1990, 5, 17),
        e_civil: Some("soltera".to_string()),
        user_id: Some("u1".to_string()),
        inventario: Some(vec![]),
    }
}

/// A valid customer whose unique fields are derived from `dni`
pub fn sample_new_cliente(dni: i64) -> NewCliente {
    NewCliente {
        id: None,
        nombre: Some("Juan".to_string()),
        apellido: Some("Perez".to_string()),
        dni: Some(dni),
        telefono: Some(1_100_000 + dni),
        mail: Some(format!("juan{dni}@mail.com")),
        domicilio: Some(format!("Av. Siempre Viva {dni}")),
        nacimiento: None,
        e_civil: None,
        user_id: None,
        inventario: None,
    }
}
