// Protected handlers: the session middleware runs first and injects a
// verified SessionIdentity into request extensions. Anything here can assume
// an authenticated caller.

pub mod lotes;
pub mod perfil;
pub mod session;
