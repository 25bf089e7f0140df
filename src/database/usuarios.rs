use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::database::models::{AgenteResumen, Usuario};

/// Profile fields a user may change on their own account
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PerfilUpdate {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
}

impl PerfilUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.apellido.is_none() && self.email.is_none()
    }
}

pub struct UsuarioRepository {
    pool: PgPool,
}

const USUARIO_COLUMNS: &str = "id, username, email, rol, nombre, apellido";

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn por_username(&self, username: &str) -> Result<Option<Usuario>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM usuarios WHERE LOWER(username) = LOWER($1)",
            USUARIO_COLUMNS
        );
        let usuario = sqlx::query_as::<_, Usuario>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    /// Check login credentials. Returns the user on a digest match, `None`
    /// for unknown usernames and wrong passwords alike.
    pub async fn verificar_credenciales(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Usuario>, DatabaseError> {
        let sql = format!(
            "SELECT {}, password_hash, salt FROM usuarios WHERE LOWER(username) = LOWER($1)",
            USUARIO_COLUMNS
        );
        let row = sqlx::query(&sql).bind(username).fetch_optional(&self.pool).await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let password_hash: String = row.try_get("password_hash")?;
        let salt: String = row.try_get("salt")?;
        if digest_hex(&salt, password) != password_hash {
            return Ok(None);
        }

        Ok(Some(Usuario {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            rol: row.try_get("rol")?,
            nombre: row.try_get("nombre")?,
            apellido: row.try_get("apellido")?,
        }))
    }

    /// Users referenced as the agent of at least one listing, matched
    /// case-insensitively, ordered by first then last name.
    pub async fn agentes(&self) -> Result<Vec<AgenteResumen>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT u.username, u.nombre, u.apellido
            FROM usuarios u
            WHERE EXISTS (
                SELECT 1 FROM lotes l WHERE LOWER(l.agente) = LOWER(u.username)
            )
            ORDER BY u.nombre, u.apellido
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let agentes = rows
            .into_iter()
            .map(|row| {
                Ok(AgenteResumen::new(
                    row.try_get("username")?,
                    row.try_get("nombre")?,
                    row.try_get("apellido")?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(agentes)
    }

    /// Update the caller's own profile fields; absent fields keep their
    /// current value. Returns the updated row, `None` when the user is gone.
    pub async fn actualizar_perfil(
        &self,
        username: &str,
        cambios: &PerfilUpdate,
    ) -> Result<Option<Usuario>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE usuarios
            SET nombre = COALESCE($2, nombre),
                apellido = COALESCE($3, apellido),
                email = COALESCE($4, email)
            WHERE LOWER(username) = LOWER($1)
            RETURNING {}
            "#,
            USUARIO_COLUMNS
        );
        let usuario = sqlx::query_as::<_, Usuario>(&sql)
            .bind(username)
            .bind(cambios.nombre.as_deref())
            .bind(cambios.apellido.as_deref())
            .bind(cambios.email.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }
}

/// Hex-encoded SHA-256 of the user's salt concatenated with the password
fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
