use clap::Parser;

use glyphgrid::cli::{self, Args, Command, ConfigAction};
use glyphgrid::config::Config;

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let args = Args::parse();

    let mut config = match (Config::load(args.config.as_deref()), &args.command) {
        (Ok(config), _) => config,
        // init creates the file, so it may not exist yet
        (Err(_), Command::Config { action: ConfigAction::Init }) => Config::default(),
        (Err(e), _) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(mode) = args.log_mode {
        config.log.mode = mode;
    }
    init_logging(config.log.level_filter());

    match args.command {
        Command::Convert(convert) => {
            if let Err(e) = cli::convert(&convert, config) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::ListFonts => cli::list_fonts(&config),
        Command::Kernels => cli::print_kernels(),
        Command::Config { action } => {
            cli::handle_config_action(action, args.config.as_deref(), &config)
        }
    }
}
