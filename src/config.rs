//! Server configuration read from command line arguments and environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};

/// The REST API server for recording transactions.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The SQLite database to store transactions in.
    ///
    /// Either a file path, a `sqlite://` URL, or `:memory:` for a throwaway
    /// in-memory database.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// The address of the interface to listen on.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Whether the server is running in development or production mode.
    ///
    /// Defaults to the mode named by `--node-env`, or production.
    #[arg(long = "environment", env = "APP_ENV", value_enum)]
    pub app_env: Option<Environment>,

    /// The Node.js style mode, development mode if it is `development`.
    #[arg(long, env = "NODE_ENV", hide = true)]
    pub node_env: Option<String>,
}

impl Config {
    /// The socket address the server should bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The mode to run the server in.
    ///
    /// An explicit `--environment` (`APP_ENV`) wins. Otherwise the server runs
    /// in development mode only when `NODE_ENV` is `development`.
    pub fn environment(&self) -> Environment {
        match (self.app_env, self.node_env.as_deref()) {
            (Some(environment), _) => environment,
            (None, Some("development")) => Environment::Development,
            (None, _) => Environment::Production,
        }
    }
}

/// The mode the server runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    /// Error responses include the error trace for debugging.
    Development,
    /// Error responses only include the error message.
    #[default]
    Production,
}
