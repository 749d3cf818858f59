//! In-memory representation of a source file's text.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Line terminator style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Newline {
    #[default]
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }
}

/// Immutable text of one source file, remembering its newline style.
///
/// Documents are UTF-8 only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDocument {
    string: String,
    newline: Newline,
}

impl TextDocument {
    /// Wrap existing text, detecting the newline style.
    pub fn from_str(string: &str) -> Self {
        let newline = if string.contains("\r\n") {
            Newline::CrLf
        } else {
            Newline::Lf
        };
        Self {
            string: string.to_owned(),
            newline,
        }
    }

    /// Build a document from lines, joined with `\n` and terminated by a
    /// trailing newline. No lines produce the empty document.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut string = String::new();
        for line in lines {
            string.push_str(line.as_ref());
            string.push('\n');
        }
        Self {
            string,
            newline: Newline::Lf,
        }
    }

    /// Read a document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_str(&data))
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    /// Lines without their terminators; a trailing newline does not produce
    /// an empty final line.
    pub fn lines(&self) -> Vec<&str> {
        self.string.lines().collect()
    }

    pub fn newline(&self) -> Newline {
        self.newline
    }

    pub fn is_empty(&self) -> bool {
        self.string.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn from_lines_appends_a_trailing_newline() {
        let doc = TextDocument::from_lines(["alpha", "beta"]);
        assert_eq!(doc.string(), "alpha\nbeta\n");
        assert_eq!(doc.lines(), vec!["alpha", "beta"]);
    }

    #[test]
    fn no_lines_produce_the_empty_document() {
        let doc = TextDocument::from_lines::<_, &str>([]);
        assert!(doc.is_empty());
        assert!(doc.lines().is_empty());
    }

    #[test]
    fn carriage_returns_are_detected_and_stripped_from_lines() {
        let doc = TextDocument::from_str("alpha\r\nbeta\r\n");
        assert_eq!(doc.newline(), Newline::CrLf);
        assert_eq!(doc.lines(), vec!["alpha", "beta"]);
    }

    #[test]
    fn from_file_reads_utf8_text() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "fn main() {{}}\n")?;
        let doc = TextDocument::from_file(file.path())?;
        assert_eq!(doc.lines(), vec!["fn main() {}"]);
        assert_eq!(doc.newline(), Newline::Lf);
        Ok(())
    }
}
