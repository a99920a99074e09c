mod auth;
mod health_check;

pub use auth::{change_password, login, me, refresh, revoke};
pub use health_check::health_check;
