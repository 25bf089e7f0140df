pub mod filtros;

pub use filtros::{filtros_agregados, FiltrosAgregados};
