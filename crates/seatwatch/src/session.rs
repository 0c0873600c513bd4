//! Account gate and pre-search conversation.
//!
//! Before the resolver runs, the user either registers or logs in, then
//! confirms they want to track a course. Like the resolver stages, every
//! prompt here honors the `quit` sentinel and invalid input loops in
//! place with a diagnostic.

use crate::console::Console;
use crate::resolver::{index_step, is_quit, Step};
use crate::store::{StoreError, UserStore};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives the account conversation over a console and store.
pub struct SessionFlow<'a, IO> {
    store: &'a UserStore,
    console: &'a mut IO,
}

impl<'a, IO: Console> SessionFlow<'a, IO> {
    pub fn new(store: &'a UserStore, console: &'a mut IO) -> Self {
        Self { store, console }
    }

    /// New-user/existing-user gate followed by registration or login.
    /// `None` means the user quit somewhere along the way.
    pub fn authenticate(&mut self) -> Result<Option<String>, SessionError> {
        self.console
            .write_line("Are you a new user or an existing user?");
        self.console.write_line("1. New User");
        self.console.write_line("2. Existing User");
        self.console.write_line("Or type 'quit' to quit.");
        loop {
            let line = self.console.read_line()?;
            match index_step(&line, 2) {
                Step::Advance(1) => return self.register(),
                Step::Advance(_) => return self.login(),
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(None),
            }
        }
    }

    /// Asks whether to start a course search. `No` and `quit` both decline.
    pub fn wants_tracking(&mut self) -> Result<bool, SessionError> {
        self.console
            .write_line("\nWould you like to add a course to track?");
        self.console.write_line("1. Yes");
        self.console.write_line("2. No");
        loop {
            let line = self.console.read_line()?;
            match index_step(&line, 2) {
                Step::Advance(1) => return Ok(true),
                Step::Advance(_) => return Ok(false),
                Step::Retry(diagnostic) => self.console.write_line(&diagnostic),
                Step::Abort => return Ok(false),
            }
        }
    }

    fn register(&mut self) -> Result<Option<String>, SessionError> {
        let username = loop {
            self.console.write_line("\nEnter a new username:");
            let line = self.console.read_line()?;
            if is_quit(&line) {
                return Ok(None);
            }
            if line.is_empty() {
                self.console.write_line("Username cannot be empty.");
                continue;
            }
            if self.store.username_exists(&line)? {
                self.console
                    .write_line("Username already exists. Please try another one.");
                continue;
            }
            break line;
        };

        self.console.write_line("Enter a new password:");
        let password = self.console.read_line()?;
        if is_quit(&password) {
            return Ok(None);
        }
        self.store.register(&username, &password)?;
        self.console.write_line("Registration successful.");
        Ok(Some(username))
    }

    fn login(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            self.console.write_line("\nEnter username:");
            let username = self.console.read_line()?;
            if is_quit(&username) {
                return Ok(None);
            }
            if !self.store.username_exists(&username)? {
                self.console.write_line("Username does not exist.");
                continue;
            }
            self.console.write_line("Enter password:");
            let password = self.console.read_line()?;
            if is_quit(&password) {
                return Ok(None);
            }
            if self.store.verify_credential(&username, &password)? {
                self.console.write_line("Login successful.");
                info!(username = %username, "login");
                return Ok(Some(username));
            }
            self.console.write_line("Incorrect password.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::ScriptedConsole;

    fn flow_result(store: &UserStore, lines: &[&str]) -> (Option<String>, String) {
        let mut console = ScriptedConsole::new(lines.iter().copied());
        let outcome = SessionFlow::new(store, &mut console)
            .authenticate()
            .unwrap();
        (outcome, console.printed())
    }

    #[test]
    fn test_registration_creates_account() {
        let store = UserStore::open_in_memory().unwrap();
        let (outcome, printed) = flow_result(&store, &["1", "alice", "correct horse"]);
        assert_eq!(outcome.as_deref(), Some("alice"));
        assert!(printed.contains("Registration successful."));
        assert!(store.verify_credential("alice", "correct horse").unwrap());
    }

    #[test]
    fn test_registration_rejects_taken_and_empty_usernames() {
        let store = UserStore::open_in_memory().unwrap();
        store.register("alice", "taken").unwrap();
        let (outcome, printed) = flow_result(&store, &["1", "", "alice", "bob", "pw"]);
        assert_eq!(outcome.as_deref(), Some("bob"));
        assert!(printed.contains("Username cannot be empty."));
        assert!(printed.contains("Username already exists."));
    }

    #[test]
    fn test_login_retries_until_correct() {
        let store = UserStore::open_in_memory().unwrap();
        store.register("alice", "secret").unwrap();
        let (outcome, printed) = flow_result(
            &store,
            &["2", "nobody", "alice", "wrong", "alice", "secret"],
        );
        assert_eq!(outcome.as_deref(), Some("alice"));
        assert!(printed.contains("Username does not exist."));
        assert!(printed.contains("Incorrect password."));
        assert!(printed.contains("Login successful."));
    }

    #[test]
    fn test_gate_rejects_unknown_choices() {
        let store = UserStore::open_in_memory().unwrap();
        let (outcome, printed) = flow_result(&store, &["3", "yes", "1", "carol", "pw"]);
        assert_eq!(outcome.as_deref(), Some("carol"));
        assert!(printed.contains("Error! Enter a number between 1 and 2"));
    }

    #[test]
    fn test_quit_is_honored_at_every_prompt() {
        let store = UserStore::open_in_memory().unwrap();
        store.register("alice", "secret").unwrap();
        let scripts: [&[&str]; 5] = [
            &["quit"],
            &["1", "quit"],
            &["1", "dave", "quit"],
            &["2", "quit"],
            &["2", "alice", "quit"],
        ];
        for script in scripts {
            let (outcome, _) = flow_result(&store, script);
            assert_eq!(outcome, None, "script {script:?} should quit");
        }
    }

    #[test]
    fn test_tracking_gate() {
        let store = UserStore::open_in_memory().unwrap();
        let cases: [(&[&str], bool); 4] = [
            (&["1"], true),
            (&["2"], false),
            (&["quit"], false),
            (&["maybe", "1"], true),
        ];
        for (script, expected) in cases {
            let mut console = ScriptedConsole::new(script.iter().copied());
            let answer = SessionFlow::new(&store, &mut console)
                .wants_tracking()
                .unwrap();
            assert_eq!(answer, expected, "script {script:?}");
        }
    }
}
