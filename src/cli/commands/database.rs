use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub const ARG_DB_HOST: &str = "db-host";
pub const ARG_DB_PORT: &str = "db-port";
pub const ARG_DB_USER: &str = "db-user";
pub const ARG_DB_PASSWORD: &str = "db-password";
pub const ARG_DB_NAME: &str = "db-name";
pub const ARG_DB_SSLMODE: &str = "db-sslmode";

#[derive(Debug, Clone)]
pub struct Options {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    pub sslmode: String,
}

impl Options {
    /// Parse database arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or empty.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        // clap passes empty env values through, treat them as missing
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let host = get_non_empty(ARG_DB_HOST)
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_DB_HOST}"))?;
        let user = get_non_empty(ARG_DB_USER)
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_DB_USER}"))?;
        let name = get_non_empty(ARG_DB_NAME)
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_DB_NAME}"))?;

        Ok(Self {
            host,
            port: matches.get_one::<u16>(ARG_DB_PORT).copied().unwrap_or(5432),
            user,
            password: SecretString::from(
                matches
                    .get_one::<String>(ARG_DB_PASSWORD)
                    .cloned()
                    .unwrap_or_default(),
            ),
            name,
            sslmode: get_non_empty(ARG_DB_SSLMODE).unwrap_or_else(|| "disable".to_string()),
        })
    }

    /// Build the `postgres://` connection string.
    ///
    /// # Errors
    /// Returns an error if the host or credentials cannot be encoded into a URL.
    pub fn dsn(&self) -> Result<SecretString> {
        let mut dsn = Url::parse(&format!("postgres://{}:{}", self.host, self.port))
            .with_context(|| format!("Invalid database host: {}", self.host))?;

        dsn.set_path(&format!("/{}", self.name));

        dsn.set_username(&self.user)
            .map_err(|()| anyhow!("Error setting username"))?;

        if !self.password.expose_secret().is_empty() {
            dsn.set_password(Some(self.password.expose_secret()))
                .map_err(|()| anyhow!("Error setting password"))?;
        }

        dsn.query_pairs_mut().append_pair("sslmode", &self.sslmode);

        Ok(SecretString::from(dsn.to_string()))
    }

    /// Connection target without credentials, safe to log.
    #[must_use]
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.name)
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_HOST)
                .long(ARG_DB_HOST)
                .help("Database host")
                .env("DATABASE_HOST")
                .default_value("localhost"),
        )
        .arg(
            Arg::new(ARG_DB_PORT)
                .long(ARG_DB_PORT)
                .help("Database port")
                .env("DATABASE_PORT")
                .default_value("5432")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DB_USER)
                .long(ARG_DB_USER)
                .help("Database username")
                .env("DATABASE_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD)
                .long(ARG_DB_PASSWORD)
                .help("Database password")
                .env("DATABASE_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_DB_NAME)
                .long(ARG_DB_NAME)
                .help("Database name")
                .env("DATABASE_NAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_SSLMODE)
                .long(ARG_DB_SSLMODE)
                .help("PostgreSQL sslmode (disable, prefer, require, verify-ca, verify-full)")
                .env("DATABASE_SSLMODE")
                .default_value("disable"),
        )
}
