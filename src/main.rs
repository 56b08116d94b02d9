use clap::{Arg, Command}; // Command-line argument parsing
use log::{error, info};
use std::path::PathBuf;

use login_keeper::auth::user_interface::run_main_menu;
use login_keeper::config::AppConfig;
use login_keeper::utils::io::Console;
use login_keeper::utils::logging::initialize_logging;
use login_keeper::{AuthService, UserStore, DEFAULT_CONFIG_FILE};

fn cli() -> Command {
    Command::new("login-keeper")
        .about("A minimal local authentication manager")
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to the JSON configuration file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("data-file")
                .long("data-file")
                .help("Path to the user store")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Path to the log file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log verbosity")
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"]),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    // Configuration file first, then command-line overrides
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = AppConfig::load(&config_path)?;
    if let Some(data_file) = matches.get_one::<PathBuf>("data-file") {
        config.data_file = data_file.clone();
    }
    if let Some(log_file) = matches.get_one::<PathBuf>("log-file") {
        config.log_file = log_file.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }

    initialize_logging(&config.log_file, config.level_filter()?)?;
    info!("Using user store at {}", config.data_file.display());

    let store = UserStore::new(config.data_file);
    let service = AuthService::new(&store);
    let mut console = Console::stdio();

    if let Err(e) = run_main_menu(&service, &mut console) {
        error!("Console failure: {}", e);
        return Err(e.into());
    }
    info!("Session ended");
    Ok(())
}
