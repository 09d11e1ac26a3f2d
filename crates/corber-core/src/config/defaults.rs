//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "corber.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "corber.yaml";

/// Directory holding the native platform projects, relative to the web root
pub const DEFAULT_PLATFORM_DIR: &str = "corber";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".corber.toml",
        ".corber.yaml",
    ]
}
