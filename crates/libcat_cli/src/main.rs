//! libcat command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `libcat_core` catalog operations.
//! - Render results as plain lines and errors as exit codes.

use clap::{Parser, Subcommand};
use libcat_core::{
    default_log_level, init_logging, BookId, CatalogError, CatalogListing, CatalogService,
    JsonFileStorage, DEFAULT_CATALOG_FILE,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Single-user library catalog manager
#[derive(Parser)]
#[command(name = "libcat")]
#[command(about = "Add, remove, search and lend books in a local catalog file")]
struct Cli {
    /// Catalog file path
    #[arg(long, env = "LIBCAT_CATALOG", default_value = DEFAULT_CATALOG_FILE)]
    catalog: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "LIBCAT_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LIBCAT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Adds a book as available
    Add {
        title: String,
        author: String,
        year: String,
    },
    /// Deletes a book by ID
    Delete { id: BookId },
    /// Finds books whose field contains the query, ignoring case
    Search {
        /// One of: title, author, year
        field: String,
        query: String,
    },
    /// Lists every book
    List,
    /// Changes the lending status of a book
    SetStatus {
        id: BookId,
        /// One of: available, checked_out
        status: String,
    },
    /// Prints the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let service = CatalogService::new(JsonFileStorage::new(&cli.catalog));
    match run(&service, cli.command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(
    service: &CatalogService<JsonFileStorage>,
    command: Command,
) -> Result<Vec<String>, CatalogError> {
    let lines = match command {
        Command::Add {
            title,
            author,
            year,
        } => {
            let book = service.add_book(title, author, year)?;
            vec![format!("Book '{}' added with ID {}.", book.title, book.id)]
        }
        Command::Delete { id } => {
            service.delete_book(id)?;
            vec![format!("Book with ID {id} deleted.")]
        }
        Command::Search { field, query } => {
            let hits = service.search_books(&query, &field)?;
            if hits.is_empty() {
                vec!["No books found.".to_string()]
            } else {
                hits.iter().map(ToString::to_string).collect()
            }
        }
        Command::List => match service.list_books()? {
            CatalogListing::Empty => vec!["The library is empty.".to_string()],
            CatalogListing::Books(books) => books.iter().map(ToString::to_string).collect(),
        },
        Command::SetStatus { id, status } => {
            let book = service.update_status(id, &status)?;
            vec![format!("Status of book {} changed to '{}'.", book.id, book.status)]
        }
        Command::Version => vec![format!("libcat_core version={}", libcat_core::core_version())],
    };
    Ok(lines)
}

fn exit_code(err: &CatalogError) -> u8 {
    if err.is_caller_error() {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code, run, Cli, Command};
    use clap::Parser;
    use libcat_core::{CatalogError, CatalogService, JsonFileStorage};

    fn service_in(dir: &tempfile::TempDir) -> CatalogService<JsonFileStorage> {
        CatalogService::new(JsonFileStorage::new(dir.path().join("books.json")))
    }

    #[test]
    fn parses_subcommands_and_catalog_flag() {
        let cli = Cli::try_parse_from([
            "libcat",
            "--catalog",
            "/tmp/shelf.json",
            "set-status",
            "4",
            "checked_out",
        ])
        .unwrap();
        assert_eq!(cli.catalog, std::path::PathBuf::from("/tmp/shelf.json"));
        assert!(matches!(cli.command, Command::SetStatus { id: 4, ref status } if status == "checked_out"));

        assert!(Cli::try_parse_from(["libcat", "delete", "not-a-number"]).is_err());
    }

    #[test]
    fn run_renders_operation_lines() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        assert_eq!(
            run(&service, Command::List).unwrap(),
            vec!["The library is empty."]
        );
        assert_eq!(
            run(
                &service,
                Command::Add {
                    title: "Dune".into(),
                    author: "Herbert".into(),
                    year: "1965".into(),
                }
            )
            .unwrap(),
            vec!["Book 'Dune' added with ID 1."]
        );
        assert_eq!(
            run(
                &service,
                Command::Search {
                    field: "title".into(),
                    query: "zzz".into(),
                }
            )
            .unwrap(),
            vec!["No books found."]
        );
        assert_eq!(
            run(&service, Command::Delete { id: 9 }).unwrap(),
            vec!["Book with ID 9 deleted."]
        );
        assert_eq!(
            run(&service, Command::List).unwrap(),
            vec!["ID: 1, Title: Dune, Author: Herbert, Year: 1965, Status: available"]
        );
    }

    #[test]
    fn caller_errors_and_storage_errors_map_to_distinct_codes() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let err = run(
            &service,
            Command::SetStatus {
                id: 1,
                status: "lost".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidStatus(_)));
        assert_eq!(exit_code(&err), 2);

        let not_found = run(
            &service,
            Command::SetStatus {
                id: 1,
                status: "available".into(),
            },
        )
        .unwrap_err();
        assert_eq!(exit_code(&not_found), 2);

        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let broken = CatalogService::new(JsonFileStorage::new(blocker.join("books.json")));
        let storage_err = run(&broken, Command::List).unwrap_err();
        assert_eq!(exit_code(&storage_err), 1);

        assert_eq!(exit_code(&CatalogError::IdExhausted), 1);
    }
}
