//! Names shared by storage, configuration and the HTTP surface.

// Storage partitions
pub const TEXT_TABLE: &str = "data_text";
pub const FILE_TABLE: &str = "data_file";

// Reference datasets
pub const DEFAULT_INFORMAL_PATH: &str = "data/new_kamusalay.csv";
pub const DEFAULT_DISALLOWED_PATH: &str = "data/abusive.csv";
pub const DISALLOWED_COLUMN: &str = "ABUSIVE";

// Defaults for the ambient stack
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_DATABASE_PATH: &str = "data/output.db";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_METRICS_PORT: u16 = 9898;

// Environment overrides
pub const ENV_PORT: &str = "DYASS_PORT";
pub const ENV_DATABASE_PATH: &str = "DYASS_DATABASE_PATH";
pub const ENV_INFORMAL_PATH: &str = "DYASS_INFORMAL_PATH";
pub const ENV_DISALLOWED_PATH: &str = "DYASS_DISALLOWED_PATH";

// Multipart field carrying an uploaded table
pub const FILE_FIELD: &str = "file";
