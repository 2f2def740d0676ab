mod cli;

use tagforged::{commands, config};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tagforged=debug,tagforged_bmff=debug".to_string()
        } else {
            "tagforged=warn,tagforged_bmff=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tag {
            file,
            title,
            artist,
            genre,
            date,
            cover,
        } => commands::tag(
            &file,
            commands::TagArgs {
                title,
                artist,
                genre,
                date,
                cover,
            },
        ),
        Commands::Show { file, json } => commands::show(&file, json),
        Commands::Brand { file, profile } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            commands::brand(&file, profile, &config)
        }
        Commands::Subtitle {
            file,
            subtitles,
            language,
            track_id,
            timescale,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(language) = language {
                config.text_track.language = language;
            }
            if let Some(timescale) = timescale {
                config.text_track.timescale = timescale;
            }
            if track_id.is_some() {
                config.text_track.track_id = track_id;
            }
            config::validate_config(&config)?;
            commands::subtitle(&file, &subtitles, &config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            commands::validate(path.as_deref())
        }
        Commands::Version => {
            println!("tagforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
