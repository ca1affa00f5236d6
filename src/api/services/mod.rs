pub mod health;
pub mod qr_crud;
pub mod redirect;
pub mod user;

pub use health::{HealthService, health_routes};
pub use qr_crud::qr_routes;
pub use redirect::{RedirectService, redirect_routes};
pub use user::{UserService, user_routes};
