pub mod lote;
pub mod usuario;

pub use lote::{Frente, Lote, RangoNumerico};
pub use usuario::{AgenteResumen, Usuario};
