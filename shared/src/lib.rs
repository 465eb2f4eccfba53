use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A customer record as persisted by every storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    /// Opaque unique identifier (UUID v4 text), immutable after creation
    pub id: String,
    /// First name
    pub nombre: String,
    /// Last name
    pub apellido: String,
    /// National ID number, unique across records
    pub dni: i64,
    pub telefono: i64,
    pub mail: String,
    /// Postal address
    pub domicilio: String,
    /// Birth date (YYYY-MM-DD)
    pub nacimiento: Option<NaiveDate>,
    /// Marital status
    pub e_civil: Option<String>,
    /// Reference to an external user entity, unique when present
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    /// Opaque inventory items, kept in insertion order
    #[serde(default)]
    pub inventario: Vec<Value>,
}

/// Input for creating a customer.
///
/// Every field is optional at the type level so that a missing required field
/// is reported by the store that rejects it, not by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCliente {
    /// Caller supplied id; a fresh UUID is generated when absent
    pub id: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: Option<i64>,
    pub telefono: Option<i64>,
    pub mail: Option<String>,
    pub domicilio: Option<String>,
    pub nacimiento: Option<NaiveDate>,
    pub e_civil: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub inventario: Option<Vec<Value>>,
}

/// Equality filter over customer fields.
///
/// A record matches when every present field is equal. The empty query
/// matches every record. Keys naming no field are refused at decode time, so
/// a misspelled filter can never widen into the empty query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClienteQuery {
    pub id: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: Option<i64>,
    pub telefono: Option<i64>,
    pub mail: Option<String>,
    pub domicilio: Option<String>,
    pub nacimiento: Option<NaiveDate>,
    pub e_civil: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

impl ClienteQuery {
    /// Query selecting a single record by id
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query selecting records by national ID number
    pub fn by_dni(dni: i64) -> Self {
        Self {
            dni: Some(dni),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check whether `cliente` satisfies every constraint of this query
    pub fn matches(&self, cliente: &Cliente) -> bool {
        fn required<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
            wanted.as_ref().map_or(true, |w| w == actual)
        }
        fn optional<T: PartialEq>(wanted: &Option<T>, actual: &Option<T>) -> bool {
            wanted.as_ref().map_or(true, |w| actual.as_ref() == Some(w))
        }

        required(&self.id, &cliente.id)
            && required(&self.nombre, &cliente.nombre)
            && required(&self.apellido, &cliente.apellido)
            && required(&self.dni, &cliente.dni)
            && required(&self.telefono, &cliente.telefono)
            && required(&self.mail, &cliente.mail)
            && required(&self.domicilio, &cliente.domicilio)
            && optional(&self.nacimiento, &cliente.nacimiento)
            && optional(&self.e_civil, &cliente.e_civil)
            && optional(&self.user_id, &cliente.user_id)
    }
}

/// Partial update merged shallowly into matching records.
///
/// `id` is not part of the update: it never changes after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClienteUpdate {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: Option<i64>,
    pub telefono: Option<i64>,
    pub mail: Option<String>,
    pub domicilio: Option<String>,
    pub nacimiento: Option<NaiveDate>,
    pub e_civil: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub inventario: Option<Vec<Value>>,
}

impl ClienteUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `cliente` that are present in this update
    pub fn apply_to(&self, cliente: &mut Cliente) {
        if let Some(nombre) = &self.nombre {
            cliente.nombre = nombre.clone();
        }
        if let Some(apellido) = &self.apellido {
            cliente.apellido = apellido.clone();
        }
        if let Some(dni) = self.dni {
            cliente.dni = dni;
        }
        if let Some(telefono) = self.telefono {
            cliente.telefono = telefono;
        }
        if let Some(mail) = &self.mail {
            cliente.mail = mail.clone();
        }
        if let Some(domicilio) = &self.domicilio {
            cliente.domicilio = domicilio.clone();
        }
        if let Some(nacimiento) = self.nacimiento {
            cliente.nacimiento = Some(nacimiento);
        }
        if let Some(e_civil) = &self.e_civil {
            cliente.e_civil = Some(e_civil.clone());
        }
        if let Some(user_id) = &self.user_id {
            cliente.user_id = Some(user_id.clone());
        }
        if let Some(inventario) = &self.inventario {
            cliente.inventario = inventario.clone();
        }
    }
}

/// Request body for bulk updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateManyRequest {
    #[serde(default)]
    pub query: ClienteQuery,
    #[serde(default)]
    pub update: ClienteUpdate,
}

/// Number of records touched by a bulk operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ana() -> Cliente {
        Cliente {
            id: "c-1".to_string(),
            nombre: "Ana".to_string(),
            apellido: "Diaz".to_string(),
            dni: 123,
            telefono: 456,
            mail: "a@b.com".to_string(),
            domicilio: "Calle 1".to_string(),
            nacimiento: NaiveDate::from_ymd_opt(1990, 5, 17),
            e_civil: Some("soltera".to_string()),
            user_id: Some("u1".to_string()),
            inventario: vec![],
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = ClienteQuery::default();
        assert!(query.is_empty());
        assert!(query.matches(&ana()));
    }

    #[test]
    fn test_query_requires_every_present_field() {
        let cliente = ana();

        let hit = ClienteQuery {
            dni: Some(123),
            nombre: Some("Ana".to_string()),
            ..ClienteQuery::default()
        };
        assert!(hit.matches(&cliente));

        let miss = ClienteQuery {
            dni: Some(123),
            nombre: Some("Eva".to_string()),
            ..ClienteQuery::default()
        };
        assert!(!miss.matches(&cliente));
    }

    #[test]
    fn test_query_on_optional_field_skips_records_without_it() {
        let mut cliente = ana();
        cliente.user_id = None;

        let query = ClienteQuery {
            user_id: Some("u1".to_string()),
            ..ClienteQuery::default()
        };
        assert!(!query.matches(&cliente));
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut cliente = ana();
        let update = ClienteUpdate {
            telefono: Some(789),
            ..ClienteUpdate::default()
        };

        update.apply_to(&mut cliente);

        let mut expected = ana();
        expected.telefono = 789;
        assert_eq!(cliente, expected);
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(ana()).unwrap();
        assert_eq!(value["eCivil"], json!("soltera"));
        assert_eq!(value["userID"], json!("u1"));
        assert_eq!(value["nacimiento"], json!("1990-05-17"));
        assert_eq!(value["inventario"], json!([]));
    }

    #[test]
    fn test_new_cliente_accepts_missing_fields() {
        let new: NewCliente = serde_json::from_value(json!({ "nombre": "Ana" })).unwrap();
        assert_eq!(new.nombre.as_deref(), Some("Ana"));
        assert!(new.dni.is_none());
        assert!(new.inventario.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(serde_json::from_value::<ClienteQuery>(json!({ "dnii": 1 })).is_err());
        assert!(serde_json::from_value::<ClienteUpdate>(json!({ "telefon": 1 })).is_err());
        assert!(serde_json::from_value::<NewCliente>(json!({ "nombre": "Ana", "edad": 30 })).is_err());
        assert!(serde_json::from_value::<UpdateManyRequest>(json!({ "filter": {} })).is_err());
    }

    #[test]
    fn test_id_is_not_an_update_field() {
        assert!(serde_json::from_value::<ClienteUpdate>(json!({ "id": "other" })).is_err());
    }

    #[test]
    fn test_invalid_birth_date_is_rejected() {
        let result: Result<NewCliente, _> =
            serde_json::from_value(json!({ "nacimiento": "2001-02-30" }));
        assert!(result.is_err());
    }
}
