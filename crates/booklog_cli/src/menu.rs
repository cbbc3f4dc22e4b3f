//! Numbered text menu over a [`BookCatalog`].
//!
//! # Responsibility
//! - Render the menu, collect prompt answers and print operation results.
//! - Keep the loop alive across invalid input and storage failures.
//!
//! # Invariants
//! - Exit and end-of-input both trigger one final snapshot.
//! - Catalog errors are printed, never propagated; only terminal I/O
//!   failures end the loop early.

use crate::prompt::{parse_read_answer, parse_search_mode, parse_year, MenuChoice};
use booklog_core::{Book, BookCatalog, CatalogError, NewBook};
use log::{info, warn};
use std::io::{self, BufRead, Write};

enum Flow {
    Continue,
    Quit,
}

/// Interactive menu loop bound to one catalog and one terminal.
pub struct MenuShell<'c, C, R, W> {
    catalog: &'c C,
    input: R,
    output: W,
}

impl<'c, C, R, W> MenuShell<'c, C, R, W>
where
    C: BookCatalog,
    R: BufRead,
    W: Write,
{
    pub fn new(catalog: &'c C, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Runs until the user exits or input ends, then snapshots the catalog.
    pub fn run(mut self) -> io::Result<()> {
        loop {
            self.render_menu()?;
            let line = match self.prompt("Enter your choice: ")? {
                Ok(line) => line,
                Err(Flow::Continue) => continue,
                Err(Flow::Quit) => break,
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                continue;
            };

            let flow = match choice {
                MenuChoice::Add => self.add_book()?,
                MenuChoice::Remove => self.remove_book()?,
                MenuChoice::Search => self.search_books()?,
                MenuChoice::List => self.list_books()?,
                MenuChoice::Statistics => self.show_statistics()?,
                MenuChoice::Exit => Flow::Quit,
            };
            if let Flow::Quit = flow {
                break;
            }
        }

        self.finish()
    }

    fn render_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Personal Library Manager")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.number(), choice.label())?;
        }
        Ok(())
    }

    /// Prints `label` and reads one line.
    ///
    /// `Err(Flow::Quit)` means input is exhausted; `Err(Flow::Continue)` means
    /// the line was rejected and the current action should be abandoned.
    fn prompt(&mut self, label: &str) -> io::Result<Result<String, Flow>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            writeln!(self.output)?;
            return Ok(Err(Flow::Quit));
        }
        let mut line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(_) => {
                writeln!(self.output, "Invalid input: not valid UTF-8.")?;
                return Ok(Err(Flow::Continue));
            }
        };
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Ok(line))
    }

    fn add_book(&mut self) -> io::Result<Flow> {
        let title = match self.prompt("Enter book title: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        let author = match self.prompt("Enter author: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        let year_text = match self.prompt("Enter publication year: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        let year = match parse_year(&year_text) {
            Ok(year) => year,
            Err(message) => {
                writeln!(self.output, "{message}")?;
                return Ok(Flow::Continue);
            }
        };
        let genre = match self.prompt("Enter genre: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        let read_answer = match self.prompt("Have you read this book? (yes/no): ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };

        let book = NewBook::new(title, author, year, genre, parse_read_answer(&read_answer));
        match self.catalog.add_book(&book) {
            Ok(_) => writeln!(self.output, "Book added successfully!")?,
            Err(err) => self.report_failure(MenuChoice::Add, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> io::Result<Flow> {
        let title = match self.prompt("Enter book title to remove: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };

        match self.catalog.remove_book(&title) {
            Ok(0) => writeln!(self.output, "No books found with that title.")?,
            Ok(removed) => writeln!(self.output, "Removed {removed} book(s) successfully!")?,
            Err(err) => self.report_failure(MenuChoice::Remove, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> io::Result<Flow> {
        let mode = match self.prompt("Search by Title (1) or Author (2)? Enter choice: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        let Some(field) = parse_search_mode(&mode) else {
            writeln!(self.output, "Invalid search mode. Enter 1 for title or 2 for author.")?;
            return Ok(Flow::Continue);
        };
        let query = match self.prompt("Enter search query: ")? {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };

        match self.catalog.search_books(field, &query) {
            Ok(books) => self.print_books(&books, "No books found.")?,
            Err(err) => self.report_failure(MenuChoice::Search, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn list_books(&mut self) -> io::Result<Flow> {
        match self.catalog.list_books() {
            Ok(books) => self.print_books(&books, "No books in the library.")?,
            Err(err) => self.report_failure(MenuChoice::List, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn show_statistics(&mut self) -> io::Result<Flow> {
        match self.catalog.statistics() {
            Ok(stats) => {
                writeln!(self.output, "Total books: {}", stats.total)?;
                writeln!(self.output, "Percentage read: {:.2}%", stats.percentage_read)?;
            }
            Err(err) => self.report_failure(MenuChoice::Statistics, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn finish(mut self) -> io::Result<()> {
        match self.catalog.snapshot() {
            Ok(()) => {
                info!("event=menu_exit module=cli status=ok");
                writeln!(self.output, "Library saved. Goodbye!")?;
            }
            Err(err) => self.report_failure(MenuChoice::Exit, &err)?,
        }
        self.output.flush()
    }

    fn print_books(&mut self, books: &[Book], empty_message: &str) -> io::Result<()> {
        if books.is_empty() {
            return writeln!(self.output, "{empty_message}");
        }
        for book in books {
            writeln!(self.output, "{book}")?;
        }
        Ok(())
    }

    fn report_failure(&mut self, choice: MenuChoice, err: &CatalogError) -> io::Result<()> {
        warn!(
            "event=menu_action module=cli status=error action={}",
            choice.action()
        );
        writeln!(self.output, "Error: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::MenuShell;
    use booklog_core::db::open_db_in_memory;
    use booklog_core::{BookCatalog, CatalogService, MirrorFile, NewBook, SqliteBookRepository};
    use std::io::Cursor;

    fn run_script(catalog: &impl BookCatalog, script: &str) -> String {
        let mut output = Vec::new();
        MenuShell::new(catalog, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn with_service<T>(f: impl FnOnce(&CatalogService<SqliteBookRepository<'_>>) -> T) -> T {
        let conn = open_db_in_memory().unwrap();
        let service = CatalogService::new(SqliteBookRepository::try_new(&conn).unwrap());
        f(&service)
    }

    #[test]
    fn add_then_list_prints_single_line_record() {
        with_service(|service| {
            let output = run_script(
                service,
                "1\nDune\nFrank Herbert\n1965\nSci-Fi\nyes\n4\n6\n",
            );

            assert!(output.contains("Book added successfully!"));
            assert!(output.contains("Dune by Frank Herbert (1965) - Sci-Fi - Read"));
            assert!(output.ends_with("Library saved. Goodbye!\n"));
            assert_eq!(service.list_books().unwrap().len(), 1);
        });
    }

    #[test]
    fn invalid_year_is_reported_without_touching_store() {
        with_service(|service| {
            let output = run_script(service, "1\nDune\nFrank Herbert\nsoon\n6\n");

            assert!(output.contains("Invalid year `soon`"));
            assert!(service.list_books().unwrap().is_empty());
        });
    }

    #[test]
    fn invalid_menu_choice_redisplays_menu() {
        with_service(|service| {
            let output = run_script(service, "9\n6\n");

            assert!(output.contains("Invalid choice. Please try again."));
            assert_eq!(output.matches("Personal Library Manager").count(), 2);
        });
    }

    #[test]
    fn non_utf8_input_is_rejected_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = MirrorFile::new(dir.path().join("library.json"));
        let conn = open_db_in_memory().unwrap();
        let service =
            CatalogService::with_mirror(SqliteBookRepository::try_new(&conn).unwrap(), mirror.clone());

        let mut script = vec![0xff, 0xfe, b'\n'];
        script.extend_from_slice(b"1\n\xffDune\n4\n6\n");
        let mut output = Vec::new();
        MenuShell::new(&service, Cursor::new(script), &mut output)
            .run()
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(output.matches("Invalid input: not valid UTF-8.").count(), 2);
        assert_eq!(output.matches("Personal Library Manager").count(), 4);
        assert!(output.contains("No books in the library."));
        assert!(output.ends_with("Library saved. Goodbye!\n"));
        assert!(mirror.path().exists());
        assert!(service.list_books().unwrap().is_empty());
    }

    #[test]
    fn remove_reports_removed_count_and_no_match() {
        with_service(|service| {
            service
                .add_book(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true))
                .unwrap();
            service
                .add_book(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false))
                .unwrap();

            let output = run_script(service, "2\nDune\n2\nDune\n6\n");

            assert!(output.contains("Removed 2 book(s) successfully!"));
            assert!(output.contains("No books found with that title."));
            assert!(service.list_books().unwrap().is_empty());
        });
    }

    #[test]
    fn search_by_author_lists_matches_and_rejects_unknown_mode() {
        with_service(|service| {
            service
                .add_book(&NewBook::new("Emma", "Jane Austen", 1815, "Novel", false))
                .unwrap();

            let output = run_script(service, "3\n2\nausten\n3\n1\nzzz\n3\n5\n6\n");

            assert!(output.contains("Emma by Jane Austen (1815) - Novel - Unread"));
            assert!(output.contains("No books found."));
            assert!(output.contains("Invalid search mode."));
        });
    }

    #[test]
    fn statistics_prints_total_and_percentage() {
        with_service(|service| {
            service
                .add_book(&NewBook::new("A", "x", 2000, "g", true))
                .unwrap();
            service
                .add_book(&NewBook::new("B", "x", 2000, "g", false))
                .unwrap();
            service
                .add_book(&NewBook::new("C", "x", 2000, "g", false))
                .unwrap();

            let output = run_script(service, "5\n6\n");

            assert!(output.contains("Total books: 3"));
            assert!(output.contains("Percentage read: 33.33%"));
        });
    }

    #[test]
    fn empty_catalog_messages() {
        with_service(|service| {
            let output = run_script(service, "4\n5\n6\n");

            assert!(output.contains("No books in the library."));
            assert!(output.contains("Percentage read: 0.00%"));
        });
    }

    #[test]
    fn end_of_input_exits_with_final_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = MirrorFile::new(dir.path().join("library.json"));
        let conn = open_db_in_memory().unwrap();
        let service =
            CatalogService::with_mirror(SqliteBookRepository::try_new(&conn).unwrap(), mirror.clone());

        let output = run_script(&service, "4\n");

        assert!(output.ends_with("Library saved. Goodbye!\n"));
        assert!(mirror.path().exists());
    }

    #[test]
    fn storage_failure_is_printed_and_loop_continues() {
        let conn = open_db_in_memory().unwrap();
        let service = CatalogService::new(SqliteBookRepository::try_new(&conn).unwrap());
        conn.execute_batch("DROP TABLE books;").unwrap();

        let output = run_script(&service, "4\n5\n6\n");

        assert_eq!(output.matches("Error: ").count(), 2);
        assert!(output.ends_with("Library saved. Goodbye!\n"));
    }
}
