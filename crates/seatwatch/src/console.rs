//! Line-oriented console surface.
//!
//! The session and resolver talk to the user exclusively through the
//! [`Console`] trait; production uses process stdin/stdout, tests script
//! input lines and capture everything written.

use std::io::{self, BufRead};

/// One prompt/response surface.
pub trait Console {
    /// Reads one line of input, trimmed. A closed input stream surfaces as
    /// an `UnexpectedEof` error; interactive flows treat that as the end of
    /// the conversation.
    fn read_line(&mut self) -> io::Result<String>;

    /// Writes one line of output.
    fn write_line(&mut self, text: &str);
}

/// Console over process stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Console;
    use std::collections::VecDeque;
    use std::io;

    /// Scripted console: answers prompts from a canned list and records
    /// everything written for assertions.
    pub struct ScriptedConsole {
        inputs: VecDeque<String>,
        pub output: Vec<String>,
    }

    impl ScriptedConsole {
        pub fn new<I>(lines: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<String>,
        {
            Self {
                inputs: lines.into_iter().map(Into::into).collect(),
                output: Vec::new(),
            }
        }

        /// Everything written so far, joined for substring assertions.
        pub fn printed(&self) -> String {
            self.output.join("\n")
        }
    }

    impl Console for ScriptedConsole {
        fn read_line(&mut self) -> io::Result<String> {
            self.inputs.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
            })
        }

        fn write_line(&mut self, text: &str) {
            self.output.push(text.to_string());
        }
    }
}
