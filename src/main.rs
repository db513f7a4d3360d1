use clap::Parser;
use nexttask::cli::commands::Cli;
use nexttask::cli::handlers;
use nexttask::io::config_io::Paths;
use nexttask::logging;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init_file(&Paths::from_env().log_file());
            run_tui(&cli)
        }
        Some(_) => {
            logging::init_stderr();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let session = handlers::open_session(cli.config.as_deref(), cli.store.as_deref())?;
    let store_path = session.controller.store().path().to_path_buf();
    nexttask::tui::run(session.controller, &session.config, &store_path)
}
