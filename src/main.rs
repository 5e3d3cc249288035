use clap::Parser;
use record_confirm::{cli, commands, console, error};
use record_confirm_common::logging::{init_logging, Verbosity};
use record_confirm_common::{Config, Session};
use cli::{Cli, Commands};
use commands::Target;
use error::{AppError, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));
    let mut config = Config::load()?;

    match cli.command {
        Commands::Show { index, json } => {
            let mut session = commands::open_session(&config, cli.file.as_deref())?;
            println!("{}", commands::show(&mut session, &config, index, json)?);
        }

        Commands::Search { term } => {
            let mut session = commands::open_session(&config, cli.file.as_deref())?;
            match commands::search(&mut session, &config, &term) {
                Ok(text) => println!("{text}"),
                Err(err) if err.is_not_found() => println!("Record not found."),
                Err(err) => return Err(err),
            }
        }

        Commands::Modify { index, find, confirmed_identifier, confirmed_results } => {
            let mut session = commands::open_session(&config, cli.file.as_deref())?;
            let target = match (index, find) {
                (_, Some(term)) => Target::Search(term),
                (Some(index), None) => Target::Index(index),
                (None, None) => Target::Index(0),
            };
            let form = commands::modify(
                &mut session,
                &target,
                confirmed_identifier.as_deref(),
                confirmed_results.as_deref(),
            )?;
            println!(
                "✔ Record {}/{} confirmed as {} [{}]",
                form.index + 1,
                form.total,
                form.confirmed_identifier,
                form.confirmed_results
            );
            if let Some(path) = session.path() {
                println!("✔ Saved {}", path.display());
            }
        }

        Commands::Edit => {
            // A missing or broken document is reported; the console still starts.
            let mut session = match commands::open_session(&config, cli.file.as_deref()) {
                Ok(session) => session,
                Err(err @ (AppError::NoDocument(_) | AppError::Record(_))) => {
                    println!("Error: {err}");
                    Session::with_config(&config)?
                }
                Err(err) => return Err(err),
            };
            console::run_console(&mut session, &config)?;
        }

        Commands::Config { show, default_file, indent, max_image_edge } => {
            if commands::update_config(&mut config, default_file, indent, max_image_edge) {
                config.save()?;
                println!("✔ Saved {}", Config::config_path()?.display());
            }
            if show {
                println!("Config: {}", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
                match config.default_document_path() {
                    Some(path) => println!("Default document: {}", path.display()),
                    None => println!("Default document: -"),
                }
            }
        }
    }

    Ok(())
}
