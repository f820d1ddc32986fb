use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

pub const ENV_DB: &str = "FLOORGRAPH_DB";
pub const ENV_LISTEN: &str = "FLOORGRAPH_LISTEN";
pub const ENV_CONNECT_ATTEMPTS: &str = "FLOORGRAPH_CONNECT_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "FLOORGRAPH_RETRY_DELAY_MS";
pub const ENV_POLL_SECS: &str = "FLOORGRAPH_POLL_SECS";

const DEFAULT_DB: &str = "graph.db";

/// Command line of `floorgraph-server`. Every flag falls back to its environment variable.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Role-aware indoor path service")]
pub struct ServiceArgs {
    /// SQLite map database, opened read-only
    #[arg(long, visible_alias = "database", env = ENV_DB, default_value = DEFAULT_DB)]
    pub db: PathBuf,
    /// HTTP listen address
    #[arg(long, env = ENV_LISTEN, default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,
    /// Connection attempts before giving up at start-up
    #[arg(
        long,
        env = ENV_CONNECT_ATTEMPTS,
        default_value_t = 15,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub connect_attempts: u32,
    /// Delay between connection attempts, in milliseconds
    #[arg(long, env = ENV_RETRY_DELAY_MS, default_value_t = 2000)]
    pub retry_delay_ms: u64,
    /// Map-version poll interval in seconds; 0 disables polling
    #[arg(long, env = ENV_POLL_SECS, default_value_t = 0)]
    pub poll_secs: u64,
}

/// Resolved settings for the path service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database: PathBuf,
    pub listen: SocketAddr,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
    /// `None` disables the map-version poller.
    pub poll_interval: Option<Duration>,
}

impl From<ServiceArgs> for ServiceConfig {
    fn from(args: ServiceArgs) -> Self {
        Self {
            database: args.db,
            listen: args.listen,
            connect_attempts: args.connect_attempts,
            retry_delay: Duration::from_millis(args.retry_delay_ms),
            poll_interval: (args.poll_secs > 0).then(|| Duration::from_secs(args.poll_secs)),
        }
    }
}

/// Arguments of the `floorgraph` command-line tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub database: String,
    pub command: String,
    pub command_args: Vec<String>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut database = String::from(DEFAULT_DB);
        let mut command = String::from("status");
        let mut command_args = Vec::new();
        let mut command_set = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if command_set {
                command_args.push(arg.to_string());
                continue;
            }
            match *arg {
                "--db" | "--database" => {
                    database = iter
                        .next()
                        .ok_or_else(|| "--db requires a value".to_string())?
                        .to_string();
                }
                "--command" => {
                    command = iter
                        .next()
                        .ok_or_else(|| "--command requires a value".to_string())?
                        .to_string();
                    command_set = true;
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    command = arg.to_string();
                    command_set = true;
                }
            }
        }
        Ok(Self {
            database,
            command,
            command_args,
        })
    }

    pub fn help() -> &'static str {
        "Usage: floorgraph [--db PATH] <status|list|path|check> [args]\n\
         \n  path --start ID --end ID [--role ROLE]\n  check [--strict]\n"
    }
}
