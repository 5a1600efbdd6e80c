// Global constants shared across the workspace

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "usedmart.toml";

/// Prefix of environment overrides, e.g. `UM_WEB__PORT=8080`.
pub const ENV_PREFIX: &str = "UM";

pub const BEARER_TOKEN: &str = "Bearer";

/// Header clients send to select the API revision.
pub const API_VERSION_HEADER: &str = "X-API-Version";
pub const API_VERSION_V1: &str = "1";

pub const ADMIN_ROLE_CODE: &str = "ADMIN";
pub const ADMIN_ROLE_NAME: &str = "Administrator";
pub const MODERATOR_ROLE_CODE: &str = "MODERATOR";
pub const MODERATOR_ROLE_NAME: &str = "Moderator";
pub const USER_ROLE_CODE: &str = "USER";
pub const USER_ROLE_NAME: &str = "Member";

pub const ADMIN_PROFILE_ID: i32 = 1;

pub const DATA_DIR: &str = "./data";
pub const LOG_DIR: &str = "./logs";
pub const LOG_FILE_PREFIX: &str = "usedmart.log";
