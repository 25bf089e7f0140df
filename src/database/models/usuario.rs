use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Dashboard user record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub rol: String,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
}

/// Identity projection for users assigned as agents on at least one listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgenteResumen {
    pub username: String,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub iniciales: String,
}

impl AgenteResumen {
    pub fn new(username: String, nombre: Option<String>, apellido: Option<String>) -> Self {
        let iniciales = iniciales(nombre.as_deref(), apellido.as_deref());
        Self {
            username,
            nombre,
            apellido,
            iniciales,
        }
    }
}

/// Upper-cased first character of each present name part. A missing part
/// contributes nothing.
pub fn iniciales(nombre: Option<&str>, apellido: Option<&str>) -> String {
    let mut out = String::new();
    for parte in [nombre, apellido] {
        if let Some(c) = parte.and_then(|s| s.trim().chars().next()) {
            out.extend(c.to_uppercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_from_both_names() {
        assert_eq!(iniciales(Some("juan"), Some("perez")), "JP");
    }

    #[test]
    fn missing_last_name_yields_single_initial() {
        assert_eq!(iniciales(Some("juan"), None), "J");
        assert_eq!(iniciales(Some("juan"), Some("")), "J");
    }

    #[test]
    fn missing_both_names_yields_empty() {
        assert_eq!(iniciales(None, None), "");
        assert_eq!(iniciales(Some("  "), None), "");
    }

    #[test]
    fn agente_resumen_computes_initials() {
        let agente = AgenteResumen::new("jperez".to_string(), Some("Juan".to_string()), Some("Perez".to_string()));
        assert_eq!(agente.iniciales, "JP");
    }
}
