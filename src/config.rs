use std::env;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://userapi.db";
const DEFAULT_MAX_DB_CONNS: u32 = 5;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_host: String,
    pub bind_port: u16,
}

impl Config {
    /// Load variables from `env_file`, or from `.env` when none is given (a missing `.env` is
    /// fine), then read the configuration from the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, dotenvy::Error> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)?;
            }
            None => {
                if let Err(err) = dotenvy::dotenv() {
                    if !err.not_found() {
                        return Err(err);
                    }
                }
            }
        }
        Ok(Self::from_env())
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            max_connections: parse_with_default(lookup("DB_POOL_MAX_CONNS"), DEFAULT_MAX_DB_CONNS),
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned()),
            bind_port: parse_with_default(lookup("BIND_PORT"), DEFAULT_BIND_PORT),
        }
    }
}

#[inline]
fn parse_with_default<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|x| x.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Config;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "sqlite://userapi.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.bind_port, 5000);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_POOL_MAX_CONNS", "12"),
            ("BIND_HOST", "127.0.0.1"),
            ("BIND_PORT", "8080"),
        ]);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.bind_host, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        let config = config_from(&[("DB_POOL_MAX_CONNS", "many"), ("BIND_PORT", "99999")]);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_port, 5000);
    }
}
