pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 30;
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";
