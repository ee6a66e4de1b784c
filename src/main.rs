use anyhow::Result;
use std::path::PathBuf;

use sidetag::config::Config;
use sidetag::{logging, server};

struct Args {
    config_path: Option<PathBuf>,
    port: Option<u16>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config_path: None,
        port: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("sidetag {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => match args.get(i + 1).and_then(|p| p.parse().ok()) {
                Some(port) => {
                    parsed.port = Some(port);
                    i += 1;
                }
                None => {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            },
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"sidetag - image dataset tag editor

USAGE:
    sidetag [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --port, -p PORT     Port to listen on (overrides config and PORT)
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    SIDETAG_CONFIG      Path to config file (overrides default location)
    SIDETAG_LOG         Log level (trace, debug, info, warn, error)
    PORT                Port to listen on
    HOST_HOME           Where the user's home is mounted for this process
    USER_HOME           The user's home as they see it; unset disables
                        path translation

Config file location: $XDG_CONFIG_HOME/sidetag/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    let mut config = match args.config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(config.logging.dir.clone())?;

    server::serve(config).await
}
