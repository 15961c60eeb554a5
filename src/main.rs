use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use muse::Feature;
use muse::core::config::{self, CliOverrides};
use muse::core::state::App;
use muse::{cli, gateway, tui};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "muse", about = "Generate code and music from a text prompt")]
struct Args {
    /// Page to open (overrides config and MUSE_FEATURE)
    #[arg(short, long, value_enum)]
    feature: Option<Feature>,

    /// Backend proxy base URL (overrides config and MUSE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Send one prompt, print the reply, and exit without the TUI
    #[arg(short, long)]
    prompt: Option<String>,

    /// Config file to use instead of ~/.muse/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("muse: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let overrides = CliOverrides {
        feature: args.feature,
        base_url: args.base_url,
    };
    let config = config::resolve(&file_config, &overrides);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let logging = File::create(&config.log_file)
        .ok()
        .is_some_and(|log_file| WriteLogger::init(config.log_level, log_config, log_file).is_ok());

    // Config was read before the logger existed; replay what it reported.
    for notice in &config.notices {
        if logging {
            log::log!(notice.level, "{}", notice.message);
        } else if notice.level <= log::Level::Warn {
            eprintln!("muse: {}", notice.message);
        }
    }

    log::info!(
        "Muse starting up: page={}, backend={}",
        config.feature,
        config.base_url
    );

    let gateway = match gateway::build_gateway(&config) {
        Ok(g) => g,
        Err(e) => {
            log::error!("Gateway setup failed: {}", e);
            eprintln!("muse: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.prompt {
        Some(prompt) => {
            cli::run_once(
                gateway,
                config.feature,
                &prompt,
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await
        }
        None => tui::run(App::from_config(gateway, &config)).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Fatal I/O error: {}", e);
            eprintln!("muse: {}", e);
            ExitCode::FAILURE
        }
    }
}
