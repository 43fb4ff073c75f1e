//! Interactive numbered menu over an [`AddressBook`].
//!
//! Generic over its input and output so it can be driven by a script in
//! tests. Output is plain text; end of input behaves like choosing Exit.
//! Exit saves only when something changed.

use std::io::{self, BufRead, Write};

use tracing::{debug, instrument};

use crate::application::codec::parse_id;
use crate::application::services::AddressBook;
use crate::application::ApplicationError;
use crate::domain::{Contact, ContactId, RenderStyle};
use crate::infrastructure::{InfraError, InfraResult};

const MENU: &str = "\
Address Book Application
------------------------
1. Add New Contact
2. Search for Contact
3. Delete Contact
4. List All Contacts
5. Display Current Tree Structure
6. Exit
------------------------";

/// Tree view parameters for option 5.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub style: RenderStyle,
    pub indent: usize,
}

struct Menu<'a, R, W> {
    book: &'a mut AddressBook,
    view: View,
    input: R,
    output: W,
}

fn write_err(e: io::Error) -> InfraError {
    InfraError::io("write menu output", e)
}

/// Runs the menu until Exit or end of input, then saves the book if it
/// changed.
#[instrument(level = "debug", skip_all, fields(path = %book.path().display()))]
pub fn run_menu<R: BufRead, W: Write>(
    book: &mut AddressBook,
    view: View,
    input: R,
    output: W,
) -> InfraResult<()> {
    let mut menu = Menu {
        book,
        view,
        input,
        output,
    };
    menu.run()
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn run(&mut self) -> InfraResult<()> {
        if self.book.load_report().missing {
            self.say("No existing file found. Starting with an empty address book.")?;
        }

        loop {
            writeln!(self.output, "\n{MENU}").map_err(write_err)?;
            let Some(choice) = self.prompt("Enter operation (1-6): ")? else {
                break;
            };
            debug!(choice = choice.trim(), "menu choice");

            let keep_going = match choice.trim() {
                "1" => self.add()?,
                "2" => self.search()?,
                "3" => self.delete()?,
                "4" => self.list()?,
                "5" => self.display()?,
                "6" => false,
                _ => {
                    self.say("Invalid choice.")?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        if self.book.is_dirty() {
            self.book.save()?;
        } else {
            debug!("no changes, skipping save");
        }
        Ok(())
    }

    fn say(&mut self, line: &str) -> InfraResult<()> {
        writeln!(self.output, "{line}").map_err(write_err)
    }

    /// `None` on end of input.
    fn read_line(&mut self) -> InfraResult<Option<String>> {
        let mut buf = String::new();
        let n = self
            .input
            .read_line(&mut buf)
            .map_err(|e| InfraError::io("read menu input", e))?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, msg: &str) -> InfraResult<Option<String>> {
        write!(self.output, "{msg}").map_err(write_err)?;
        self.output.flush().map_err(write_err)?;
        self.read_line()
    }

    /// Re-prompts until an integer id is entered.
    fn prompt_id(&mut self, msg: &str) -> InfraResult<Option<ContactId>> {
        let mut answer = self.prompt(msg)?;
        while let Some(raw) = answer {
            match parse_id(&raw) {
                Ok(id) => return Ok(Some(id)),
                Err(_) => answer = self.prompt("ID must be integer: ")?,
            }
        }
        Ok(None)
    }

    // Each action returns false when input ran out.

    fn add(&mut self) -> InfraResult<bool> {
        let Some(id) = self.prompt_id("Enter unique ID (integer): ")? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Enter name: ")? else {
            return Ok(false);
        };
        let Some(phone) = self.prompt("Enter phone: ")? else {
            return Ok(false);
        };
        let Some(email) = self.prompt("Enter email: ")? else {
            return Ok(false);
        };

        match self.book.add(Contact::new(id, name, phone, email)) {
            Ok(()) => self.say("Contact added successfully.")?,
            Err(ApplicationError::DuplicateId(_)) => {
                self.say("Contact with this ID already exists.")?
            }
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }

    fn search(&mut self) -> InfraResult<bool> {
        let Some(id) = self.prompt_id("Enter ID to search: ")? else {
            return Ok(false);
        };
        let text = match self.book.find(id) {
            Some(c) => format!(
                "Contact found:\nID: {}\nName: {}\nPhone: {}\nEmail: {}",
                c.id, c.name, c.phone, c.email
            ),
            None => "Contact not found.".to_string(),
        };
        self.say(&text)?;
        Ok(true)
    }

    fn delete(&mut self) -> InfraResult<bool> {
        let Some(id) = self.prompt_id("Enter ID to delete: ")? else {
            return Ok(false);
        };
        match self.book.delete(id) {
            Ok(_) => self.say("Contact deleted successfully.")?,
            Err(ApplicationError::ContactNotFound(_)) => self.say("Contact not found.")?,
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }

    fn list(&mut self) -> InfraResult<bool> {
        let lines: Vec<String> = self.book.list().iter().map(|c| c.to_string()).collect();
        self.say("Contacts in Address Book (sorted by ID):")?;
        for line in &lines {
            self.say(line)?;
        }
        Ok(true)
    }

    fn display(&mut self) -> InfraResult<bool> {
        let rendered = self.book.render(self.view.style, self.view.indent);
        self.say("Current AVL Tree:")?;
        write!(self.output, "{rendered}").map_err(write_err)?;
        Ok(true)
    }
}
