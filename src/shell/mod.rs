//! Interactive menu shell.
//!
//! A thin loop that translates menu choices into ledger calls and renders
//! the results. All validation that belongs to the user interface lives
//! here: menu choices and ratings are re-prompted until numeric, and a blank
//! feedback id gets a generated one. The ledger never sees any of that.
//!
//! The shell is generic over [`BufRead`] and [`Write`], so tests drive whole
//! sessions through in-memory buffers. End of input behaves like choosing
//! Exit, which is also what makes piped sessions terminate cleanly.
//!
//! Everything user-facing goes through the shell's writer; logs go to stderr
//! via `tracing`, keeping the menu readable.

use crate::models::NewFeedback;
use crate::services::{self, FeedbackLedger};
use crate::storage::DocumentStore;
use crate::{Error, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Whether the session goes on after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Continue,
    Quit,
}

/// Menu-driven session over a feedback ledger.
pub struct Shell<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell reading from `input` and rendering to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the input or output stream
    /// itself fails; ledger and export errors are rendered as messages and
    /// do not end the session.
    pub fn run<S: DocumentStore>(&mut self, ledger: &mut FeedbackLedger<S>) -> Result<()> {
        loop {
            self.render_menu()?;
            let Some(choice) = self.read_choice()? else {
                break;
            };

            let signal = match choice {
                1 => self.handle_add(ledger)?,
                2 => self.handle_display_all(ledger)?,
                3 => self.handle_search(ledger)?,
                4 => self.handle_update(ledger)?,
                5 => self.handle_delete(ledger)?,
                6 => self.handle_average(ledger)?,
                7 => self.handle_export(ledger)?,
                8 => Signal::Quit,
                _ => {
                    self.say("Invalid choice. Try again!")?;
                    Signal::Continue
                },
            };
            if signal == Signal::Quit {
                break;
            }
        }

        self.say("Exiting...")
    }

    fn render_menu(&mut self) -> Result<()> {
        self.say("")?;
        self.say("--- Customer Feedback Ledger ---")?;
        self.say("1. Add Feedback")?;
        self.say("2. Display All Feedback")?;
        self.say("3. Search Feedback by ID")?;
        self.say("4. Update Feedback")?;
        self.say("5. Delete Feedback")?;
        self.say("6. Calculate Average Rating")?;
        self.say("7. Export Feedback")?;
        self.say("8. Exit")
    }

    fn handle_add<S: DocumentStore>(&mut self, ledger: &mut FeedbackLedger<S>) -> Result<Signal> {
        let Some(id) = self.prompt_line("Enter Feedback ID (blank to generate): ")? else {
            return Ok(Signal::Quit);
        };
        let id = id.trim().to_string();
        let id = if id.is_empty() {
            let generated = generate_feedback_id();
            self.say(&format!("Using generated ID: {generated}"))?;
            generated
        } else {
            id
        };

        let Some(customer) = self.prompt_line("Enter Customer Name: ")? else {
            return Ok(Signal::Quit);
        };
        let Some(text) = self.prompt_line("Enter Feedback Text: ")? else {
            return Ok(Signal::Quit);
        };
        let Some(rating) = self.read_rating("Enter Rating (1-5): ")? else {
            return Ok(Signal::Quit);
        };

        match ledger.add(NewFeedback::new(
            id.as_str(),
            customer.trim(),
            text,
            rating,
        )) {
            Ok(()) => self.say("Feedback added successfully!")?,
            Err(Error::DuplicateId { id }) => {
                self.say(&format!("A feedback entry with ID '{id}' already exists."))?;
            },
            Err(e) => self.say(&format!("Operation failed: {e}"))?,
        }
        Ok(Signal::Continue)
    }

    fn handle_display_all<S: DocumentStore>(
        &mut self,
        ledger: &FeedbackLedger<S>,
    ) -> Result<Signal> {
        if ledger.is_empty() {
            self.say("No feedback found.")?;
            return Ok(Signal::Continue);
        }

        self.say("")?;
        self.say("--- All Customer Feedback ---")?;
        for record in ledger {
            writeln!(
                self.output,
                "ID: {} | Name: {} | Rating: {}",
                record.id, record.customer, record.rating
            )
            .map_err(output_error)?;
            writeln!(self.output, "Feedback: {}", record.text).map_err(output_error)?;
            writeln!(self.output, "----------------------------------------")
                .map_err(output_error)?;
        }
        Ok(Signal::Continue)
    }

    fn handle_search<S: DocumentStore>(&mut self, ledger: &FeedbackLedger<S>) -> Result<Signal> {
        let Some(id) = self.prompt_line("Enter Feedback ID to search: ")? else {
            return Ok(Signal::Quit);
        };

        match ledger.find(id.trim()) {
            Some(record) => {
                self.say("Found Feedback:")?;
                writeln!(self.output, "Customer: {}", record.customer).map_err(output_error)?;
                writeln!(self.output, "Rating: {}", record.rating).map_err(output_error)?;
                writeln!(self.output, "Feedback: {}", record.text).map_err(output_error)?;
            },
            None => self.say("Feedback not found.")?,
        }
        Ok(Signal::Continue)
    }

    fn handle_update<S: DocumentStore>(
        &mut self,
        ledger: &mut FeedbackLedger<S>,
    ) -> Result<Signal> {
        let Some(id) = self.prompt_line("Enter Feedback ID to update: ")? else {
            return Ok(Signal::Quit);
        };
        let Some(text) = self.prompt_line("Enter new feedback text: ")? else {
            return Ok(Signal::Quit);
        };
        let Some(rating) = self.read_rating("Enter new rating (1-5): ")? else {
            return Ok(Signal::Quit);
        };

        match ledger.update(id.trim(), text, rating) {
            Ok(()) => self.say("Feedback updated successfully!")?,
            Err(Error::NotFound { .. }) => self.say("Feedback not found.")?,
            Err(e) => self.say(&format!("Operation failed: {e}"))?,
        }
        Ok(Signal::Continue)
    }

    fn handle_delete<S: DocumentStore>(
        &mut self,
        ledger: &mut FeedbackLedger<S>,
    ) -> Result<Signal> {
        let Some(id) = self.prompt_line("Enter Feedback ID to delete: ")? else {
            return Ok(Signal::Quit);
        };

        match ledger.delete(id.trim()) {
            Ok(()) => self.say("Feedback deleted successfully!")?,
            Err(Error::NotFound { .. }) => self.say("Feedback not found.")?,
            Err(e) => self.say(&format!("Operation failed: {e}"))?,
        }
        Ok(Signal::Continue)
    }

    fn handle_average<S: DocumentStore>(&mut self, ledger: &FeedbackLedger<S>) -> Result<Signal> {
        match ledger.average_rating() {
            Some(summary) => {
                writeln!(
                    self.output,
                    "Average Rating: {:.2} ({} feedback entries)",
                    summary.average, summary.count
                )
                .map_err(output_error)?;
            },
            None => self.say("No feedback available for aggregation.")?,
        }
        Ok(Signal::Continue)
    }

    fn handle_export<S: DocumentStore>(&mut self, ledger: &FeedbackLedger<S>) -> Result<Signal> {
        let Some(path) = self.prompt_line("Enter export file path (.json or .csv): ")? else {
            return Ok(Signal::Quit);
        };
        let path = path.trim();
        if path.is_empty() {
            self.say("No export path given.")?;
            return Ok(Signal::Continue);
        }

        match services::export_to_path(ledger, Path::new(path)) {
            Ok(count) => self.say(&format!("Exported {count} records to {path}"))?,
            Err(e) => self.say(&format!("Export failed: {e}"))?,
        }
        Ok(Signal::Continue)
    }

    /// Reads a menu choice, re-prompting until the line parses as a number.
    ///
    /// `None` means input ended.
    fn read_choice(&mut self) -> Result<Option<u32>> {
        self.write_prompt("Enter your choice: ")?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse() {
                Ok(choice) => return Ok(Some(choice)),
                Err(_) => self.write_prompt("Invalid input. Enter a number: ")?,
            }
        }
    }

    /// Reads a rating, re-prompting until it is an integer in 1..=5.
    fn read_rating(&mut self, prompt: &str) -> Result<Option<i64>> {
        self.write_prompt(prompt)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse::<i64>() {
                Ok(rating) if (1..=5).contains(&rating) => return Ok(Some(rating)),
                _ => self.write_prompt("Invalid rating. Enter a number from 1 to 5: ")?,
            }
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.write_prompt(prompt)?;
        self.read_line()
    }

    /// Reads one line; `None` on end of input. Line endings are stripped,
    /// interior whitespace is kept.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::operation("read_input", e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").map_err(output_error)
    }

    fn write_prompt(&mut self, prompt: &str) -> Result<()> {
        write!(self.output, "{prompt}").map_err(output_error)?;
        self.output.flush().map_err(output_error)
    }
}

fn output_error(e: std::io::Error) -> Error {
    Error::operation("write_output", e)
}

fn generate_feedback_id() -> String {
    format!("fb_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::io::Cursor;

    /// Runs a scripted session and returns everything written to the output.
    fn run_session(ledger: &mut FeedbackLedger<MemoryStore>, script: &str) -> String {
        let mut output = Vec::new();
        let mut shell = Shell::new(Cursor::new(script), &mut output);
        shell.run(ledger).expect("session should not fail");
        String::from_utf8(output).expect("shell output should be utf-8")
    }

    #[test]
    fn test_add_then_display() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "1\nF1\nAlice\nGreat service\n5\n2\n8\n");

        assert!(output.contains("Feedback added successfully!"));
        assert!(output.contains("ID: F1 | Name: Alice | Rating: 5"));
        assert!(output.contains("Feedback: Great service"));
        assert!(output.contains("Exiting..."));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_blank_id_generates_one() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "1\n\nAlice\nFine\n4\n8\n");

        assert!(output.contains("Using generated ID: fb_"));
        assert!(output.contains("Feedback added successfully!"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.iter().next().unwrap().id.as_str().starts_with("fb_"));
    }

    #[test]
    fn test_menu_reprompts_on_junk() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "menu\n8\n");

        assert!(output.contains("Invalid input. Enter a number: "));
        assert!(output.contains("Exiting..."));
    }

    #[test]
    fn test_out_of_range_choice_redisplays_menu() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "9\n8\n");

        assert!(output.contains("Invalid choice. Try again!"));
    }

    #[test]
    fn test_rating_reprompts_until_in_range() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "1\nF1\nAlice\nOk\nsix\n0\n6\n3\n8\n");

        let reprompts = output.matches("Invalid rating.").count();
        assert_eq!(reprompts, 3);
        assert_eq!(ledger.find("F1").map(|r| r.rating), Some(3));
    }

    #[test]
    fn test_search_found_and_missing() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "1\nF1\nAlice\nGreat\n5\n3\nF1\n3\nF9\n8\n");

        assert!(output.contains("Found Feedback:"));
        assert!(output.contains("Customer: Alice"));
        assert!(output.contains("Feedback not found."));
    }

    #[test]
    fn test_duplicate_add_is_reported() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(
            &mut ledger,
            "1\nF1\nAlice\nGreat\n5\n1\nF1\nBob\nAgain\n2\n8\n",
        );

        assert!(output.contains("A feedback entry with ID 'F1' already exists."));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_update_and_delete_flow() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(
            &mut ledger,
            "1\nF1\nAlice\nGreat\n5\n4\nF1\nRevised\n3\n5\nF1\n8\n",
        );

        assert!(output.contains("Feedback updated successfully!"));
        assert!(output.contains("Feedback deleted successfully!"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_average_empty_and_populated() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(
            &mut ledger,
            "6\n1\nF1\nAlice\nGreat\n5\n1\nF2\nBob\nSlow\n2\n6\n8\n",
        );

        assert!(output.contains("No feedback available for aggregation."));
        assert!(output.contains("Average Rating: 3.50 (2 feedback entries)"));
    }

    #[test]
    fn test_display_empty_ledger() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "2\n8\n");

        assert!(output.contains("No feedback found."));
    }

    #[test]
    fn test_eof_behaves_like_exit() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        // Script ends without ever choosing Exit.
        let output = run_session(&mut ledger, "");

        assert!(output.contains("Exiting..."));
    }

    #[test]
    fn test_eof_mid_add_exits_without_partial_record() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        // Input ends right after the customer name prompt.
        let output = run_session(&mut ledger, "1\nF1\nAlice\n");

        assert!(output.contains("Exiting..."));
        assert!(ledger.is_empty());
        assert!(ledger.store().documents().is_empty());
    }

    #[test]
    fn test_export_session_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let script = format!("1\nF1\nAlice\nGreat\n5\n7\n{}\n8\n", path.display());
        let output = run_session(&mut ledger, &script);

        assert!(output.contains("Exported 1 records to"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"feedback_id\": \"F1\""));
    }

    #[test]
    fn test_export_session_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.csv");
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let script = format!("1\nF1\nAlice\nGreat\n5\n7\n{}\n8\n", path.display());
        let output = run_session(&mut ledger, &script);

        assert!(output.contains("Exported 1 records to"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("feedback_id,customer_name,feedback_text,rating"));
        assert!(contents.contains("F1,Alice,Great,5"));
    }

    #[test]
    fn test_export_bad_extension_keeps_session_alive() {
        let mut ledger = FeedbackLedger::open(MemoryStore::new()).unwrap();
        let output = run_session(&mut ledger, "7\nout.xml\n6\n8\n");

        assert!(output.contains("Export failed:"));
        // The session carries on after the failure.
        assert!(output.contains("No feedback available for aggregation."));
    }
}
