//! Tests for the interactive menu, driven by scripted input

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use addrbook::application::services::AddressBook;
use addrbook::cli::menu::{run_menu, View};
use addrbook::domain::RenderStyle;
use addrbook::infrastructure::traits::RealFileSystem;
use addrbook::util::testing::init_test_setup;

const VIEW: View = View {
    style: RenderStyle::Sideways,
    indent: 6,
};

/// Runs the menu over `script` and returns everything it printed.
fn drive(path: &Path, script: &str) -> (AddressBook, String) {
    init_test_setup();
    let mut book = AddressBook::open(Arc::new(RealFileSystem), path).unwrap();
    let mut out = Vec::new();
    run_menu(&mut book, VIEW, Cursor::new(script), &mut out).unwrap();
    (book, String::from_utf8(out).unwrap())
}

#[test]
fn given_missing_file_when_starting_then_announces_empty_book() {
    let temp = TempDir::new().unwrap();

    let (_, out) = drive(&temp.path().join("contacts.csv"), "6\n");

    assert!(out.starts_with("No existing file found. Starting with an empty address book.\n"));
    assert!(out.contains("1. Add New Contact"));
    assert!(out.contains("Enter operation (1-6): "));
}

#[test]
fn given_non_integer_id_when_adding_then_reprompts_until_integer() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    let script = "1\nabc\n4.5\n5\nAnn\n111\nann@x.org\n6\n";

    // Act
    let (book, out) = drive(&path, script);

    // Assert
    assert_eq!(out.matches("ID must be integer: ").count(), 2);
    assert!(out.contains("Contact added successfully."));
    assert_eq!(book.find(5).unwrap().name, "Ann");
}

#[test]
fn given_duplicate_id_when_adding_then_reports_and_keeps_original() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    let script = "1\n5\nAnn\n111\na\n1\n5\nBob\n222\nb\n6\n";

    let (book, out) = drive(&path, script);

    assert!(out.contains("Contact with this ID already exists."));
    assert_eq!(book.len(), 1);
    assert_eq!(book.find(5).unwrap().name, "Ann");
}

#[test]
fn given_contacts_when_searching_then_prints_fields_or_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    fs::write(&path, "5,Ann,111,ann@x.org\n").unwrap();

    let (_, out) = drive(&path, "2\n5\n2\n6\n6\n");

    assert!(out.contains("Contact found:\nID: 5\nName: Ann\nPhone: 111\nEmail: ann@x.org\n"));
    assert!(out.contains("Contact not found."));
    assert!(!out.contains("No existing file found."));
}

#[test]
fn given_contacts_when_deleting_then_reports_outcome() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    fs::write(&path, "5,Ann,111,a\n7,Bob,222,b\n").unwrap();

    let (book, out) = drive(&path, "3\n5\n3\n5\n6\n");

    assert!(out.contains("Contact deleted successfully."));
    assert!(out.contains("Contact not found."));
    assert_eq!(book.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "7,Bob,222,b\n");
}

#[test]
fn given_contacts_when_listing_and_displaying_then_sorted_and_rendered() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    fs::write(&path, "30,C,3,c\n10,A,1,a\n20,B,2,b\n").unwrap();

    let (_, out) = drive(&path, "4\n5\n6\n");

    assert!(out.contains(
        "Contacts in Address Book (sorted by ID):\n\
         ID: 10, Name: A, Phone: 1, Email: a\n\
         ID: 20, Name: B, Phone: 2, Email: b\n\
         ID: 30, Name: C, Phone: 3, Email: c\n"
    ));
    assert!(out.contains("Current AVL Tree:\n      30 (h=1)\n20 (h=2)\n      10 (h=1)\n"));
}

#[test]
fn given_unknown_choice_when_selected_then_invalid_choice_and_menu_again() {
    let temp = TempDir::new().unwrap();

    let (_, out) = drive(&temp.path().join("contacts.csv"), "9\nhello\n6\n");

    assert_eq!(out.matches("Invalid choice.").count(), 2);
    assert_eq!(out.matches("6. Exit").count(), 3);
}

#[test]
fn given_exit_when_selected_then_book_saved() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");

    let (book, _) = drive(&path, "1\n2\nBo\n9\nbo@x\n1\n1\nAl\n8\nal@x\n6\n");

    assert!(!book.is_dirty());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1,Al,8,al@x\n2,Bo,9,bo@x\n"
    );
}

#[test]
fn given_input_ends_mid_prompt_when_running_then_saves_and_returns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");

    // second add is cut off after the name
    let (book, _) = drive(&path, "1\n1\nAl\n8\nal@x\n1\n2\nBo");

    assert_eq!(book.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1,Al,8,al@x\n");
}

#[test]
fn given_missing_file_and_no_changes_when_exiting_then_no_file_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");

    let (_, out) = drive(&path, "4\n6\n");

    assert!(out.contains("Contacts in Address Book (sorted by ID):"));
    assert!(!path.exists());
}

#[test]
fn given_only_lookups_when_exiting_then_data_file_left_untouched() {
    // Arrange: a blank line that a save would drop
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contacts.csv");
    let original = "5,Ann,111,ann@x.org\n\n7,Bob,222,b\n";
    fs::write(&path, original).unwrap();

    // Act
    let (book, _) = drive(&path, "2\n5\n3\n9\n5\n6\n");

    // Assert
    assert!(!book.is_dirty());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}
