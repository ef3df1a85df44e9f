pub mod me; // GET /auth/me - current user

pub use me::me_get;
