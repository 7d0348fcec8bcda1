pub mod admin;
pub mod auth;
pub mod seed;

pub use admin::AdminService;
pub use auth::AuthService;
pub use seed::SeedProcedure;
