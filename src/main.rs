use std::env;

use armory::cli;
use armory::config::load_config_from_env;
use armory::model::Environment;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config_from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            std::process::exit(1);
        }
    };
    let environment = Environment::from_config(&config);

    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args, &environment));
}
