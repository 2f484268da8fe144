//! Running an external program as the document converter.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use crate::adapters::DocumentConverter;
use crate::Error;

/// Pipes fenced source through a program's stdin and reads HTML from its
/// stdout, e.g. `comrak --unsafe` or `pandoc -f rst -t html`.
///
/// The program must pass raw HTML through; otherwise fence markers are
/// escaped and never rendered.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// A converter running `program` with `args`.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandConverter {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a converter from an already-split command line.  Returns `None`
    /// if `words` is empty.
    pub fn from_words(words: Vec<String>) -> Option<Self> {
        let mut words = words.into_iter();
        let program = words.next()?;
        Some(CommandConverter::new(program, words))
    }
}

impl DocumentConverter for CommandConverter {
    fn convert(&self, fenced: &str) -> Result<String, Error> {
        log::debug!("converting with {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Converter(format!("cannot run {}: {}", self.program, e)))?;

        // Feed stdin from another thread so a converter that starts writing
        // before it has read everything cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Converter(format!("{} has no stdin", self.program)))?;
        let input = fenced.to_string();
        let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = feeder
            .join()
            .map_err(|_| Error::Converter("stdin writer panicked".to_string()))?;

        // A converter that fails early closes its stdin; report the exit
        // status rather than the broken pipe.
        if !output.status.success() {
            return Err(Error::Converter(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        written?;

        String::from_utf8(output.stdout)
            .map_err(|e| Error::Converter(format!("{} wrote invalid UTF-8: {}", self.program, e)))
    }
}
