// Public handlers: no session required.
//
// The lote catalog and its filter metadata are readable without a session;
// login/logout manage the session cookie itself.

pub mod lotes;
pub mod session;
