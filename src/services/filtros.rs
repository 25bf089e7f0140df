use serde::Serialize;

use crate::database::lotes::LoteRepository;
use crate::database::models::{AgenteResumen, RangoNumerico};
use crate::database::usuarios::UsuarioRepository;
use crate::database::{DatabaseError, DatabaseManager};

/// Merged filter payload: every selectable option list plus the numeric
/// ranges, recomputed from the store on each request. Serving this in one
/// response saves the dashboard seven round-trips.
#[derive(Debug, Serialize)]
pub struct FiltrosAgregados {
    pub barrios: Vec<String>,
    pub estados: Vec<String>,
    pub origenes: Vec<String>,
    pub tipos: Vec<String>,
    pub agentes: Vec<AgenteResumen>,
    pub area: Option<RangoNumerico>,
    pub frente: Option<RangoNumerico>,
}

/// Run the seven independent reads concurrently and merge them.
///
/// All-or-nothing: a single failed sub-query fails the whole aggregate so
/// the dashboard never renders half-empty filter controls silently.
pub async fn filtros_agregados() -> Result<FiltrosAgregados, DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    let lotes = LoteRepository::new(pool.clone());
    let usuarios = UsuarioRepository::new(pool);

    let (barrios, estados, origenes, tipos, agentes, area, frente) = tokio::try_join!(
        lotes.barrios(),
        lotes.estados(),
        lotes.origenes(),
        lotes.tipos(),
        usuarios.agentes(),
        lotes.rango_area(),
        lotes.rango_frente(),
    )?;

    Ok(FiltrosAgregados {
        barrios,
        estados,
        origenes,
        tipos,
        agentes,
        area,
        frente,
    })
}
