//! Entry point for the **wfshade** command-line tool.
//!
//! Parses one command, connects to the compositor, runs it and exits.
//! Any transport or compositor failure is logged and turns into exit
//! status 1; command-line mistakes exit with status 2.

use log::{debug, error, info, warn};
use std::process::exit;
use wfshade::command::{parse_args, USAGE};
use wfshade::config::Config;
use wfshade::ipc::client::Client;
use wfshade::wayfire::socket_from_env;

/// Resolve the config directory (`$XDG_CONFIG_HOME/wfshade`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("wfshade")
}

/// Try to load the config from `$XDG_CONFIG_HOME/wfshade/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            debug!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let invocation = match parse_args(std::env::args().skip(1)) {
        Ok(Some(inv)) => inv,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("wfshade: {}\n\n{}", e, USAGE);
            exit(2);
        }
    };

    let config = load_config();
    let Some(endpoint) = config.resolve_endpoint(invocation.socket.as_deref(), socket_from_env())
    else {
        error!("no compositor socket: pass --socket, set \"socket\" in the config, or run inside Wayfire");
        exit(2);
    };

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("cannot determine working directory: {}", e);
            exit(1);
        }
    };
    let command = invocation.command.resolve_paths(&cwd);

    let client = match Client::connect_with(&endpoint, &config.connect_options()) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let status = match command.execute(&client) {
        Ok(outcome) => {
            if let Some(line) = command.summary(&outcome) {
                println!("{}", line);
            }
            match outcome.remote_error() {
                Some(msg) => {
                    error!("{}: {}", command, msg);
                    1
                }
                None => 0,
            }
        }
        Err(e) => {
            error!("{}: {}", command, e);
            1
        }
    };

    if let Err(e) = client.close() {
        warn!("closing connection: {}", e);
    }
    exit(status);
}
