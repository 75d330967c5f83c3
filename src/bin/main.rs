// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use library_app_rs::{
    BookLoanRequest, BookRequest, BookReturnRequest, BookType, Library, LibraryError,
    UserCreateRequest, UserId, UserUpdateRequest,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Library App - Replay library command CSV files
///
/// Reads user, book, loan and return commands from a CSV file, applies them
/// to an in-memory library and writes a report to stdout.
/// Log verbosity is controlled with `RUST_LOG` (default: `warn`).
#[derive(Parser, Debug)]
#[command(name = "library-app")]
#[command(about = "A library backend that replays command CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: type,id,user,book,category,age
    /// Example: cargo run -- commands.csv --report statistics > stats.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Report written to stdout after all commands are applied
    #[arg(long, value_enum, default_value_t = Report::Histories)]
    report: Report,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Report {
    /// One row per loan, plus one empty row per user without loans
    Histories,
    /// Number of catalogue books per category
    Statistics,
}

/// Errors that abort a run.
#[derive(Error, Debug)]
enum RunError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let library = match process_commands(BufReader::new(file)) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error processing commands: {}", e);
            process::exit(1);
        }
    };

    match library.books().count_loaned_book() {
        Ok(loaned) => info!(loaned, "finished replaying commands"),
        Err(e) => warn!(error = %e, "could not count open loans"),
    }

    let written = match args.report {
        Report::Histories => write_histories(&library, std::io::stdout()),
        Report::Statistics => write_statistics(&library, std::io::stdout()),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, id, user, book, category, age`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    command: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    id: Option<u64>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    book: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    category: Option<BookType>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    age: Option<u32>,
}

/// A library operation decoded from one CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    RegisterUser { name: String, age: Option<u32> },
    AddBook { name: String, book_type: BookType },
    Loan { user: String, book: String },
    Return { user: String, book: String },
    Rename { id: UserId, name: String },
    DeleteUser { name: String },
}

impl CsvRecord {
    /// Converts CSV record to a command.
    ///
    /// Returns `None` for unknown command types or missing required fields.
    fn into_command(self) -> Option<Command> {
        match self.command.to_lowercase().as_str() {
            "user" => Some(Command::RegisterUser {
                name: self.user?,
                age: self.age,
            }),
            "book" => Some(Command::AddBook {
                name: self.book?,
                book_type: self.category?,
            }),
            "loan" => Some(Command::Loan {
                user: self.user?,
                book: self.book?,
            }),
            "return" => Some(Command::Return {
                user: self.user?,
                book: self.book?,
            }),
            "rename" => Some(Command::Rename {
                id: UserId(self.id?),
                name: self.user?,
            }),
            "delete" => Some(Command::DeleteUser { name: self.user? }),
            _ => None,
        }
    }
}

fn apply(library: &Library, command: Command) -> Result<(), LibraryError> {
    match command {
        Command::RegisterUser { name, age } => {
            library
                .users()
                .save_user(UserCreateRequest::new(name, age))?;
        }
        Command::AddBook { name, book_type } => {
            library
                .books()
                .save_book(BookRequest::new(name, book_type))?;
        }
        Command::Loan { user, book } => {
            library.books().loan_book(BookLoanRequest::new(user, book))?;
        }
        Command::Return { user, book } => {
            library
                .books()
                .return_book(BookReturnRequest::new(user, book))?;
        }
        Command::Rename { id, name } => {
            library
                .users()
                .update_user_name(UserUpdateRequest::new(id, name))?;
        }
        Command::DeleteUser { name } => library.users().delete_user(&name)?,
    }
    Ok(())
}

/// Replays commands from a CSV reader onto a fresh library.
///
/// Rows are streamed. Malformed rows and rejected commands (unknown user,
/// title already on loan, ...) are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `type, id, user, book, category, age`
/// - `type`: Command (user, book, loan, return, rename, delete)
/// - `id`: User ID, only for rename
/// - `user`: User name (new name for rename)
/// - `book`: Book title
/// - `category`: Book type (COMPUTER, ECONOMY, SOCIETY, LANGUAGE, SCIENCE)
/// - `age`: Optional user age
///
/// # Example
///
/// ```csv
/// type,id,user,book,category,age
/// user,,A,,,20
/// book,,,Rust,COMPUTER,
/// loan,,A,Rust,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
fn process_commands<R: Read>(reader: R) -> Result<Library, csv::Error> {
    let library = Library::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        match result {
            Ok(record) => {
                let Some(command) = record.into_command() else {
                    warn!(row, "skipping invalid command record");
                    continue;
                };

                if let Err(e) = apply(&library, command) {
                    warn!(row, error = %e, "skipping rejected command");
                }
            }
            Err(e) => {
                warn!(row, error = %e, "skipping malformed row");
                continue;
            }
        }
    }

    Ok(library)
}

/// One output row of the histories report.
#[derive(Debug, Serialize)]
struct HistoryRow {
    user: String,
    book: Option<String>,
    returned: Option<bool>,
}

/// Writes every user's loan history as CSV.
///
/// # CSV Format
///
/// Columns: `user, book, returned`
///
/// ```csv
/// user,book,returned
/// A,Rust,false
/// B,,
/// ```
fn write_histories<W: Write>(library: &Library, writer: W) -> Result<(), RunError> {
    let mut wtr = Writer::from_writer(writer);

    for history in library.users().get_user_loan_histories()? {
        if history.books.is_empty() {
            wtr.serialize(HistoryRow {
                user: history.name,
                book: None,
                returned: None,
            })?;
            continue;
        }
        for book in history.books {
            wtr.serialize(HistoryRow {
                user: history.name.clone(),
                book: Some(book.name),
                returned: Some(book.is_return),
            })?;
        }
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes catalogue statistics as CSV with columns `type, count`.
fn write_statistics<W: Write>(library: &Library, writer: W) -> Result<(), RunError> {
    let mut wtr = Writer::from_writer(writer);

    for stat in library.books().get_book_statistics()? {
        wtr.serialize(stat)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "type,id,user,book,category,age\n";

    fn replay(rows: &str) -> Library {
        process_commands(Cursor::new(format!("{HEADER}{rows}"))).unwrap()
    }

    fn histories_csv(library: &Library) -> String {
        let mut output = Vec::new();
        write_histories(library, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parse_user_and_book() {
        let library = replay("user,,A,,,20\nbook,,,Rust,COMPUTER,\n");

        let users = library.users().get_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "A");
        assert_eq!(users[0].age, Some(20));

        let stats = library.books().get_book_statistics().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].book_type, BookType::Computer);
    }

    #[test]
    fn parse_loan_and_return() {
        let library = replay(
            "user,,A,,,\n\
             loan,,A,Rust,,\n\
             return,,A,Rust,,\n\
             loan,,A,Rust,,\n",
        );

        assert_eq!(library.books().count_loaned_book().unwrap(), 1);
        assert_eq!(
            histories_csv(&library),
            "user,book,returned\nA,Rust,true\nA,Rust,false\n"
        );
    }

    #[test]
    fn parse_with_whitespace() {
        let library = replay(" user , , A , , , 30 \n");

        let users = library.users().get_users().unwrap();
        assert_eq!(users[0].name, "A");
        assert_eq!(users[0].age, Some(30));
    }

    #[test]
    fn rejected_commands_are_skipped() {
        let library = replay(
            "user,,A,,,\n\
             user,,B,,,\n\
             loan,,A,Rust,,\n\
             loan,,B,Rust,,\n\
             loan,,nobody,Go,,\n",
        );

        assert_eq!(library.books().count_loaned_book().unwrap(), 1);
        assert_eq!(
            histories_csv(&library),
            "user,book,returned\nA,Rust,false\nB,,\n"
        );
    }

    #[test]
    fn skip_malformed_rows() {
        let library = replay(
            "user,,A,,,\n\
             book,,,Rust,NOT_A_TYPE,\n\
             teleport,,A,,,\n\
             user,,B,,,\n",
        );

        assert_eq!(library.users().get_users().unwrap().len(), 2);
        assert!(library.books().get_book_statistics().unwrap().is_empty());
    }

    #[test]
    fn rename_and_delete() {
        let library = replay(
            "user,,A,,,\n\
             user,,B,,,\n\
             rename,1,C,,,\n\
             delete,,B,,,\n",
        );

        let names: Vec<String> = library
            .users()
            .get_users()
            .unwrap()
            .into_iter()
            .map(|user| user.name)
            .collect();
        assert_eq!(names, vec!["C".to_string()]);
    }

    #[test]
    fn write_statistics_to_csv() {
        let library = replay(
            "book,,,A,COMPUTER,\n\
             book,,,B,COMPUTER,\n\
             book,,,C,SCIENCE,\n",
        );

        let mut output = Vec::new();
        write_statistics(&library, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "type,count\nCOMPUTER,2\nSCIENCE,1\n");
    }

    #[test]
    fn command_types_are_case_insensitive() {
        let record = CsvRecord {
            command: "LOAN".to_string(),
            id: None,
            user: Some("A".to_string()),
            book: Some("Rust".to_string()),
            category: None,
            age: None,
        };
        assert_eq!(
            record.into_command(),
            Some(Command::Loan {
                user: "A".to_string(),
                book: "Rust".to_string(),
            })
        );
    }
}
