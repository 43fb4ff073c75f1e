//! Command dispatch for the one-shot subcommands and the menu.

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::AddressBook;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::menu::{run_menu, View};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{Contact, RenderStyle};
use crate::infrastructure::di::ServiceContainer;

/// Resolve settings from config files, environment and the `--file` flag.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let config_dir = match &cli.config_dir {
        Some(dir) if !dir.is_dir() => {
            return Err(CliError::InvalidArgs(format!(
                "config dir is not a directory: {}",
                dir.display()
            )));
        }
        Some(dir) => dir.clone(),
        None => PathBuf::from("."),
    };

    let mut settings = Settings::load(Some(&config_dir))?;
    if let Some(file) = &cli.file {
        settings.data_file = file.clone();
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // commands that never touch the data file
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Config { command }) => return config(cli, command),
        _ => {}
    }

    let settings = resolve_settings(cli)?;
    let container = ServiceContainer::new(settings);
    let settings = &container.settings;
    let mut book = container.address_book()?;
    let interactive = matches!(cli.command, Some(Commands::Shell) | None);
    for warning in load_warnings(&book, interactive) {
        output::warning(&warning);
    }

    match &cli.command {
        Some(Commands::Add {
            id,
            name,
            phone,
            email,
        }) => add(&mut book, settings, Contact::new(*id, name, phone, email)),
        Some(Commands::Search { id }) => search(&book, *id),
        Some(Commands::Delete { id }) => delete(&mut book, settings, *id),
        Some(Commands::List) => list(&book),
        Some(Commands::Tree { style }) => {
            let style = style.map(RenderStyle::from).unwrap_or(settings.render_style);
            tree(&book, style, settings.indent)
        }
        Some(Commands::Info) => info(&book),
        Some(Commands::Shell) | None => shell(&mut book, settings),
        Some(Commands::Completion { .. }) | Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Warnings about how the data file loaded. The menu announces a missing
/// file itself, so `interactive` leaves that one out.
fn load_warnings(book: &AddressBook, interactive: bool) -> Vec<String> {
    let report = book.load_report();
    let mut warnings = Vec::new();
    if report.missing && !interactive {
        warnings.push(format!(
            "no data file at {}, starting with an empty address book",
            book.path().display()
        ));
    }
    if !report.duplicates.is_empty() {
        warnings.push(format!(
            "ignored duplicate ids in {}: {:?}",
            book.path().display(),
            report.duplicates
        ));
    }
    warnings
}

fn persist(book: &mut AddressBook, settings: &Settings) -> CliResult<()> {
    if settings.autosave {
        book.save()?;
    } else {
        output::warning("autosave disabled, changes not written");
    }
    Ok(())
}

#[instrument(level = "debug", skip(book, settings, contact), fields(id = contact.id))]
fn add(book: &mut AddressBook, settings: &Settings, contact: Contact) -> CliResult<()> {
    book.add(contact)?;
    persist(book, settings)?;
    output::success("Contact added successfully.");
    Ok(())
}

#[instrument(level = "debug", skip(book))]
fn search(book: &AddressBook, id: i64) -> CliResult<()> {
    match book.find(id) {
        Some(contact) => {
            output::header("Contact found:");
            output::field("ID", &contact.id);
            output::field("Name", &contact.name);
            output::field("Phone", &contact.phone);
            output::field("Email", &contact.email);
            Ok(())
        }
        None => Err(ApplicationError::ContactNotFound(id).into()),
    }
}

#[instrument(level = "debug", skip(book, settings))]
fn delete(book: &mut AddressBook, settings: &Settings, id: i64) -> CliResult<()> {
    book.delete(id)?;
    persist(book, settings)?;
    output::success("Contact deleted successfully.");
    Ok(())
}

fn list(book: &AddressBook) -> CliResult<()> {
    output::header("Contacts in Address Book (sorted by ID):");
    for contact in book.list() {
        output::info(contact);
    }
    Ok(())
}

fn tree(book: &AddressBook, style: RenderStyle, indent: usize) -> CliResult<()> {
    output::header("Current AVL Tree:");
    print!("{}", book.render(style, indent));
    Ok(())
}

fn info(book: &AddressBook) -> CliResult<()> {
    output::field("Data file", &book.path().display());
    output::field("Contacts", &book.len());
    output::field("Height", &book.height());
    book.verify()?;
    output::success("tree invariants hold");
    Ok(())
}

fn shell(book: &mut AddressBook, settings: &Settings) -> CliResult<()> {
    let view = View {
        style: settings.render_style,
        indent: settings.indent,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_menu(book, view, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => {
            print!("{}", Settings::template());
        }
    }
    Ok(())
}
