//! Console input/output.
//!
//! The console is parameterized over its streams: stdin/stdout in the
//! binary, in-memory buffers in tests.

use std::io::{BufRead, Write};

use crate::config::Configuration;
use crate::error::Result;

/// Interactive console bound to an input and an output stream.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes a line of text.
    pub fn writeln(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Writes an empty line.
    pub fn blank_line(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Asks the user to pick one of `choices` by index.
    ///
    /// Blank input or end-of-input selects `default`. Anything that is not
    /// an in-range index re-prompts; invalid input never selects silently.
    pub fn choose(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize> {
        loop {
            self.writeln(question)?;
            for (index, choice) in choices.iter().enumerate() {
                self.writeln(&format!(" [{index}] {choice}"))?;
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(default);
            }
            let line = line.trim();
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<usize>() {
                Ok(index) if index < choices.len() => return Ok(index),
                _ => self.writeln(&format!("\"{line}\" is not a valid selection"))?,
            }
        }
    }
}

/// Resolves the target namespace from the configuration.
///
/// A single configured namespace is selected automatically. With several,
/// the user picks one interactively, defaulting to the first; the selection
/// is confirmed on the console.
pub fn select_namespace<R: BufRead, W: Write>(
    configuration: &Configuration,
    console: &mut Console<R, W>,
) -> Result<String> {
    let first = configuration.first_namespace()?.to_string();
    let namespaces = configuration.namespaces();

    if namespaces.len() == 1 {
        return Ok(first);
    }

    let index = console.choose(
        "Please choose a namespace (defaults to the first one)",
        &namespaces,
        0,
    )?;
    let selected = namespaces[index].to_string();
    console.writeln(&format!("You have selected the \"{selected}\" namespace"))?;
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn configuration() -> Configuration {
        let mut config = Configuration::new();
        config.add_migrations_directory("FooNs", "/tmp/foo");
        config.add_migrations_directory("FooNs2", "/tmp/foo2");
        config
    }

    #[test]
    fn test_choose_blank_input_selects_default() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"\n".as_slice()), &mut output);

        let index = console.choose("Pick one", &["a", "b"], 0).unwrap();
        assert_eq!(index, 0);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Pick one"));
        assert!(text.contains(" [0] a"));
        assert!(text.contains(" [1] b"));
    }

    #[test]
    fn test_choose_end_of_input_selects_default() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"".as_slice()), &mut output);

        assert_eq!(console.choose("Pick one", &["a", "b"], 0).unwrap(), 0);
    }

    #[test]
    fn test_choose_by_index() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"1\n".as_slice()), &mut output);

        assert_eq!(console.choose("Pick one", &["a", "b"], 0).unwrap(), 1);
    }

    #[test]
    fn test_choose_reprompts_on_invalid_input() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"9\nnope\n1\n".as_slice()), &mut output);

        assert_eq!(console.choose("Pick one", &["a", "b"], 0).unwrap(), 1);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"9\" is not a valid selection"));
        assert!(text.contains("\"nope\" is not a valid selection"));
        // The question is shown again for every attempt
        assert_eq!(text.matches("Pick one").count(), 3);
    }

    #[test]
    fn test_select_namespace_single() {
        let mut config = Configuration::new();
        config.add_migrations_directory("FooNs", "/tmp/foo");

        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"".as_slice()), &mut output);

        let selected = select_namespace(&config, &mut console).unwrap();
        assert_eq!(selected, "FooNs");

        // No prompt, no confirmation for the single-namespace case
        assert!(output.is_empty());
    }

    #[test]
    fn test_select_namespace_defaults_to_first() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"\n".as_slice()), &mut output);

        let selected = select_namespace(&configuration(), &mut console).unwrap();
        assert_eq!(selected, "FooNs");

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Please choose a namespace (defaults to the first one)"));
        assert!(text.contains(" [0] FooNs"));
        assert!(text.contains(" [1] FooNs2"));
        assert!(text.contains("You have selected the \"FooNs\" namespace"));
    }

    #[test]
    fn test_select_namespace_by_index() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"1\n".as_slice()), &mut output);

        let selected = select_namespace(&configuration(), &mut console).unwrap();
        assert_eq!(selected, "FooNs2");

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("You have selected the \"FooNs2\" namespace"));
    }

    #[test]
    fn test_select_namespace_requires_configuration() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"".as_slice()), &mut output);

        assert!(select_namespace(&Configuration::new(), &mut console).is_err());
    }
}
