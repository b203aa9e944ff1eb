//! Server Configuration
//!
//! Command-line flags win over environment variables, which win over the
//! defaults.
//!
//! | Flag          | Env          | Default        |
//! |---------------|--------------|----------------|
//! | `--bind`      | `CANTOS_BIND`| `0.0.0.0:3100` |
//! | `--db`        | `CANTOS_DB`  | in-memory      |
//! | `--log-level` | `CANTOS_LOG` | `info`         |

use anyhow::{anyhow, bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_BIND: &str = "0.0.0.0:3100";

pub const USAGE: &str = "\
Usage: live-cantos [--bind <addr:port>] [--db <path>] [--log-level <level>]
Example: live-cantos --bind 127.0.0.1:3100 --db data/cantos.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// SQLite file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3100)),
            db_path: None,
            log_level: Level::INFO,
        }
    }
}

impl ServerConfig {
    pub fn from_env_and_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse(&args, |key| std::env::var(key).ok())
    }

    /// `args` excludes the program name. `env` looks up one variable.
    pub fn parse<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(bind) = env("CANTOS_BIND") {
            config.bind = parse_bind(&bind).context("CANTOS_BIND")?;
        }
        if let Some(path) = env("CANTOS_DB").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = env("CANTOS_LOG") {
            config.log_level = parse_level(&level).context("CANTOS_LOG")?;
        }

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow!("Missing value for {}", flag));

            match flag {
                "--bind" => config.bind = parse_bind(value?)?,
                "--db" => config.db_path = Some(PathBuf::from(value?)),
                "--log-level" => config.log_level = parse_level(value?)?,
                other => bail!("Unknown argument: {}", other),
            }
            i += 2;
        }

        Ok(config)
    }
}

fn parse_bind(value: &str) -> Result<SocketAddr> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", value))
}

fn parse_level(value: &str) -> Result<Level> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid log level '{}'", value))
}
