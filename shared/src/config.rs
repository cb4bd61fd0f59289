use std::env;
use std::path::PathBuf;

pub const DEFAULT_USERS_ROUTE: &str = "/usuario";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";

/// Settings read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path the users route answers on.
    pub users_route: String,
    /// Sent back as `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
    /// JSON seed for the in-memory directory.
    pub directory_seed: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_route: DEFAULT_USERS_ROUTE.to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            directory_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let users_route = lookup("USERS_ROUTE")
            .filter(|route| !route.is_empty())
            .unwrap_or_else(|| DEFAULT_USERS_ROUTE.to_string());
        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let directory_seed = lookup("DIRECTORY_SEED")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self {
            users_route,
            allowed_origin,
            directory_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.users_route, "/usuario");
        assert_eq!(config.allowed_origin, "*");
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("USERS_ROUTE", "/api/usuario"),
            ("ALLOWED_ORIGIN", "https://biblioteca.escola.br"),
            ("DIRECTORY_SEED", "/var/task/seed.json"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.users_route, "/api/usuario");
        assert_eq!(config.allowed_origin, "https://biblioteca.escola.br");
        assert_eq!(
            config.directory_seed,
            Some(PathBuf::from("/var/task/seed.json"))
        );
    }

    #[test]
    fn empty_values_fall_back() {
        let config = Config::from_lookup(|_| Some(String::new()));
        assert_eq!(config.users_route, DEFAULT_USERS_ROUTE);
        assert_eq!(config.directory_seed, None);
    }
}
