//! Process configuration, read once at startup.

pub mod app;
pub mod cookie;
pub mod store;

pub use app::AppConfig;
pub use cookie::{CookiePolicy, RuntimeEnv};
pub use store::StoreBackend;
