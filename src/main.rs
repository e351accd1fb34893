use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use menubar::core::config::{self, MenubarConfig};
use menubar::core::i18n::{Catalog, Translate};
use menubar::core::state::Platform;
use menubar::menu::MenuEngine;
use menubar::menu::fingerprint::Fingerprint;
use menubar::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "menubar", about = "Reactive application menu, hosted in a terminal")]
struct Args {
    /// Platform whose menu conventions to follow (defaults to the current one)
    #[arg(short, long, value_enum)]
    platform: Option<Platform>,

    /// Print the composed menu as JSON and exit
    #[arg(long)]
    print_menu: bool,

    /// Log level for menubar.log
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to menubar.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("menubar.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        MenubarConfig::default()
    });
    let resolved = config::resolve(&file_config, args.platform);
    log::info!(
        "Menubar starting up for {} with {} servers",
        resolved.platform,
        resolved.servers.len()
    );

    let translator: Arc<dyn Translate> = Arc::new(Catalog::english().with_overrides(&resolved.labels));

    if args.print_menu {
        let mut engine = MenuEngine::new(translator);
        let tree = engine
            .project(&resolved.initial_snapshot())
            .map_err(std::io::Error::other)?;
        let json = Fingerprint::of(&tree).to_json_pretty().map_err(std::io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    tui::run(resolved, translator)
}
