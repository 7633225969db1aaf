//! Connection parameters and environment snapshots.
//!
//! Environment state is read exactly once, by the dedicated loaders in this
//! module, into plain snapshot structs that are then passed by value into the
//! registration pass. The resolution algorithm itself never touches
//! `std::env`.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{BindError, BindResult};

/// Driver used when neither the environment nor the inherited connection
/// names one.
pub const DEFAULT_DRIVER: &str = "pdo_mysql";

/// Charset used when neither the environment nor the inherited connection
/// names one.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Logical connection parameters.
///
/// The parameter set a dedicated connection is built from. Fields without a
/// universal fallback stay optional; `driver` and `charset` always resolve to
/// something (`pdo_mysql` / `utf8mb4` at the last resort).
///
/// # Examples
///
/// ```rust
/// use manifold_di::{ConnectionParams, EnvOverrides};
///
/// let base = ConnectionParams::default()
///     .with_host("db.internal")
///     .with_dbname("app");
///
/// // No explicit name override: the inherited name gets the chain suffix,
/// // keeping the dedicated chain off the default database.
/// let dedicated = base.with_overrides(&EnvOverrides::none(), "_reports");
/// assert_eq!(dedicated.dbname.as_deref(), Some("app_reports"));
/// assert_eq!(dedicated.host.as_deref(), Some("db.internal"));
/// assert_eq!(dedicated.driver, "pdo_mysql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ConnectionParams {
    /// Database host
    pub host: Option<String>,
    /// Database port
    pub port: Option<u16>,
    /// Database name
    pub dbname: Option<String>,
    /// Database user
    pub user: Option<String>,
    /// Database password
    pub password: Option<String>,
    /// Driver name
    pub driver: String,
    /// Connection charset
    pub charset: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            dbname: None,
            user: None,
            password: None,
            driver: DEFAULT_DRIVER.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl ConnectionParams {
    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the database name.
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    /// Sets the user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the driver.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Sets the charset.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Clones these parameters with environment overrides applied.
    ///
    /// Resolution order per field: explicit override in the environment
    /// snapshot, then the inherited value, then the hard-coded fallback
    /// (driver and charset only). The database name is special: without an
    /// explicit override, the inherited name gets `suffix` appended, so a
    /// dedicated chain never silently shares the default database.
    pub fn with_overrides(&self, env: &EnvOverrides, suffix: &str) -> ConnectionParams {
        let dbname = match &env.dbname {
            Some(name) => Some(name.clone()),
            None => self.dbname.as_ref().map(|name| format!("{}{}", name, suffix)),
        };
        ConnectionParams {
            host: env.host.clone().or_else(|| self.host.clone()),
            port: env.port.or(self.port),
            dbname,
            user: env.user.clone().or_else(|| self.user.clone()),
            password: env.password.clone().or_else(|| self.password.clone()),
            driver: env.driver.clone().unwrap_or_else(|| self.driver.clone()),
            charset: env.charset.clone().unwrap_or_else(|| self.charset.clone()),
        }
    }
}

/// Snapshot of per-prefix connection overrides from the environment.
///
/// For prefix `reports` the loader reads `REPORTS_DB_HOST`,
/// `REPORTS_DB_PORT`, `REPORTS_DB_NAME`, `REPORTS_DB_USER`,
/// `REPORTS_DB_PASSWORD`, `REPORTS_DB_DRIVER` and `REPORTS_DB_CHARSET`.
/// Absent variables stay `None` and fall through to the inherited default
/// connection parameters.
///
/// # Examples
///
/// ```rust
/// use manifold_di::EnvOverrides;
///
/// // No variables set: every field falls through.
/// let overrides = EnvOverrides::from_env("no_such_prefix_set").unwrap();
/// assert_eq!(overrides, EnvOverrides::none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct EnvOverrides {
    /// `{PREFIX}_DB_HOST`
    pub host: Option<String>,
    /// `{PREFIX}_DB_PORT`
    pub port: Option<u16>,
    /// `{PREFIX}_DB_NAME`
    pub dbname: Option<String>,
    /// `{PREFIX}_DB_USER`
    pub user: Option<String>,
    /// `{PREFIX}_DB_PASSWORD`
    pub password: Option<String>,
    /// `{PREFIX}_DB_DRIVER`
    pub driver: Option<String>,
    /// `{PREFIX}_DB_CHARSET`
    pub charset: Option<String>,
}

impl EnvOverrides {
    /// An empty snapshot: every field falls through to the inherited value.
    pub fn none() -> Self {
        Self::default()
    }

    /// Loads the snapshot for a prefix from process environment variables.
    ///
    /// A present but unparseable `{PREFIX}_DB_PORT` is a configuration error
    /// and fails loudly here rather than surfacing later inside the passes.
    pub fn from_env(prefix: &str) -> BindResult<Self> {
        let upper = prefix.to_uppercase();
        let var = |suffix: &str| env::var(format!("{}_DB_{}", upper, suffix)).ok();

        let port = match var("PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| BindError::InvalidParameter {
                name: format!("{}_DB_PORT", upper),
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            host: var("HOST"),
            port,
            dbname: var("NAME"),
            user: var("USER"),
            password: var("PASSWORD"),
            driver: var("DRIVER"),
            charset: var("CHARSET"),
        })
    }

    /// Sets the database name override (test and programmatic configuration).
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    /// Sets the host override.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port override.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the user override.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the driver override.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }
}

/// Application environment flags read once at startup.
///
/// `APP_ENV=dev` turns on development mode, which managers receive at
/// construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct AppEnv {
    /// Development-mode flag for manager construction
    pub dev_mode: bool,
}

impl AppEnv {
    /// Loads the flag from `APP_ENV`.
    pub fn from_env() -> Self {
        Self {
            dev_mode: env::var("APP_ENV").map(|v| v == "dev").unwrap_or(false),
        }
    }

    /// Development-mode environment.
    pub fn development() -> Self {
        Self { dev_mode: true }
    }

    /// Production environment.
    pub fn production() -> Self {
        Self { dev_mode: false }
    }
}
