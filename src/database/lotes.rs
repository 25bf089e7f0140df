use sqlx::postgres::PgArguments;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Frente, Lote, RangoNumerico};
use crate::filter::{SqlParam, SqlResult};

/// Page of search results plus the unpaginated total
#[derive(Debug, serde::Serialize)]
pub struct BusquedaLotes {
    pub lotes: Vec<Lote>,
    pub total: i64,
}

/// Mutable listing fields a dashboard user may change
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct LoteUpdate {
    pub estado: Option<String>,
    pub agente: Option<String>,
}

impl LoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.estado.is_none() && self.agente.is_none()
    }
}

pub struct LoteRepository {
    pool: PgPool,
}

const LOTE_COLUMNS: &str = "smp, direccion, barrio, estado, origen, tipo, agente, area, fecha_alta";

impl LoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn barrios(&self) -> Result<Vec<String>, DatabaseError> {
        self.distinct("barrio").await
    }

    pub async fn estados(&self) -> Result<Vec<String>, DatabaseError> {
        self.distinct("estado").await
    }

    pub async fn origenes(&self) -> Result<Vec<String>, DatabaseError> {
        self.distinct("origen").await
    }

    pub async fn tipos(&self) -> Result<Vec<String>, DatabaseError> {
        self.distinct("tipo").await
    }

    /// Distinct non-null values of a listing column, ascending. The column
    /// name is one of a fixed set of literals above, never client input.
    async fn distinct(&self, column: &'static str) -> Result<Vec<String>, DatabaseError> {
        let sql = format!(
            "SELECT DISTINCT \"{col}\" FROM lotes WHERE \"{col}\" IS NOT NULL ORDER BY \"{col}\" ASC",
            col = column
        );
        let values = sqlx::query_scalar::<_, String>(&sql).fetch_all(&self.pool).await?;
        Ok(values)
    }

    /// Observed bounds of the surface area across listings with a positive
    /// area. `None` when no listing qualifies.
    pub async fn rango_area(&self) -> Result<Option<RangoNumerico>, DatabaseError> {
        let (min, max): (Option<f64>, Option<f64>) =
            sqlx::query_as("SELECT MIN(area), MAX(area) FROM lotes WHERE area > 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(match (min, max) {
            (Some(min), Some(max)) => Some(RangoNumerico::from_observed(min, max)),
            _ => None,
        })
    }

    /// Observed bounds of frontage metres across the frentes table.
    pub async fn rango_frente(&self) -> Result<Option<RangoNumerico>, DatabaseError> {
        let (min, max): (Option<f64>, Option<f64>) =
            sqlx::query_as("SELECT MIN(frente), MAX(frente) FROM frentes WHERE frente > 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(match (min, max) {
            (Some(min), Some(max)) => Some(RangoNumerico::from_observed(min, max)),
            _ => None,
        })
    }

    pub async fn por_smp(&self, smp: &str) -> Result<Option<Lote>, DatabaseError> {
        let sql = format!("SELECT {} FROM lotes WHERE smp = $1", LOTE_COLUMNS);
        let lote = sqlx::query_as::<_, Lote>(&sql)
            .bind(smp)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lote)
    }

    pub async fn frentes_por_smp(&self, smp: &str) -> Result<Vec<Frente>, DatabaseError> {
        let frentes =
            sqlx::query_as::<_, Frente>("SELECT smp, calle, frente FROM frentes WHERE smp = $1 ORDER BY calle")
                .bind(smp)
                .fetch_all(&self.pool)
                .await?;
        Ok(frentes)
    }

    /// Filtered, paginated catalog search. Callers compile the filter with
    /// `LoteFilter::to_sql` so invalid input is rejected before reaching here.
    pub async fn buscar(&self, sql_result: &SqlResult) -> Result<BusquedaLotes, DatabaseError> {
        let where_sql = if sql_result.where_clause.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", sql_result.where_clause)
        };

        let select_sql = format!(
            "SELECT {} FROM lotes{} ORDER BY smp LIMIT {} OFFSET {}",
            LOTE_COLUMNS, where_sql, sql_result.limit, sql_result.offset
        );
        let mut select = sqlx::query_as::<_, Lote>(&select_sql);
        for param in &sql_result.params {
            select = bind_param_query_as(select, param);
        }
        let lotes = select.fetch_all(&self.pool).await?;

        let count_sql = format!("SELECT COUNT(*) FROM lotes{}", where_sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &sql_result.params {
            count = bind_param_scalar(count, param);
        }
        let total = count.fetch_one(&self.pool).await?;

        Ok(BusquedaLotes { lotes, total })
    }

    /// Update mutable fields on a listing. Returns false when the SMP is unknown.
    pub async fn actualizar(&self, smp: &str, cambios: &LoteUpdate) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE lotes SET estado = COALESCE($2, estado), agente = COALESCE($3, agente) WHERE smp = $1",
        )
        .bind(smp)
        .bind(cambios.estado.as_deref())
        .bind(cambios.agente.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match param {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Float(f) => q.bind(*f),
    }
}

fn bind_param_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments> {
    match param {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Float(f) => q.bind(*f),
    }
}
