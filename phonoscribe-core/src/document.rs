//! Documents, units and the unit splitter
//!
//! A document is either a single text or an explicit list of lines. The
//! splitter turns it into independently processable units and remembers the
//! shape so the assembler can rebuild the same kind of value.

use std::fmt;

/// Caller input, a single text or an ordered list of lines
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Document {
    /// A single string, units are its lines
    Text(String),
    /// An explicit list, one unit per element
    Lines(Vec<String>),
}

impl Document {
    /// Returns true for the single string variant
    pub fn is_text(&self) -> bool {
        matches!(self, Document::Text(_))
    }

    /// Borrow the text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Document::Text(text) => Some(text),
            Document::Lines(_) => None,
        }
    }

    /// Borrow the list variant
    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Document::Text(_) => None,
            Document::Lines(lines) => Some(lines),
        }
    }

    /// Unwrap the text variant
    pub fn into_text(self) -> Option<String> {
        match self {
            Document::Text(text) => Some(text),
            Document::Lines(_) => None,
        }
    }

    /// Unwrap the list variant
    pub fn into_lines(self) -> Option<Vec<String>> {
        match self {
            Document::Text(_) => None,
            Document::Lines(lines) => Some(lines),
        }
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Document::Text(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Document::Text(text.to_string())
    }
}

impl From<Vec<String>> for Document {
    fn from(lines: Vec<String>) -> Self {
        Document::Lines(lines)
    }
}

impl From<Vec<&str>> for Document {
    fn from(lines: Vec<&str>) -> Self {
        Document::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Document {
    fn from(lines: &[&str]) -> Self {
        Document::Lines(lines.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Text(text) => f.write_str(text),
            Document::Lines(lines) => f.write_str(&lines.join("\n")),
        }
    }
}

/// Shape of the input, used to rebuild the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Input was a single string split on line breaks
    Text {
        /// Line break found after each unit but the last, `\n` or `\r\n`
        breaks: Vec<String>,
    },
    /// Input was a list
    Lines,
}

/// One line of input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    index: usize,
    text: String,
    terminator: bool,
}

impl Unit {
    /// Create a regular unit
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            terminator: false,
        }
    }

    fn terminator(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            terminator: true,
        }
    }

    /// Position of the unit in the document
    pub fn index(&self) -> usize {
        self.index
    }

    /// Unit text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True for the empty unit produced by a trailing line break
    pub fn is_terminator(&self) -> bool {
        self.terminator
    }
}

/// Result of splitting a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument {
    /// Units in document order
    pub units: Vec<Unit>,
    /// Shape to restore on output
    pub shape: Shape,
}

impl SplitDocument {
    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if there are no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Split a document into units
pub fn split(document: &Document) -> SplitDocument {
    match document {
        Document::Lines(lines) => SplitDocument {
            units: lines
                .iter()
                .enumerate()
                .map(|(i, line)| Unit::new(i, line.clone()))
                .collect(),
            shape: Shape::Lines,
        },
        Document::Text(text) => split_text(text),
    }
}

fn split_text(text: &str) -> SplitDocument {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let mut breaks = Vec::with_capacity(lines.len());
    // every piece but the last was followed by a '\n'
    let broken = lines.len() - 1;
    for line in lines.iter_mut().take(broken) {
        match line.strip_suffix('\r') {
            Some(stripped) => {
                *line = stripped;
                breaks.push("\r\n".to_string());
            }
            None => breaks.push("\n".to_string()),
        }
    }

    let last = lines.len() - 1;
    let units = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == last && i > 0 && line.is_empty() {
                Unit::terminator(i)
            } else {
                Unit::new(i, line)
            }
        })
        .collect();

    SplitDocument {
        units,
        shape: Shape::Text { breaks },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        let doc = Document::from(vec!["one two", "three", "four five"]);
        let split = split(&doc);

        assert_eq!(split.shape, Shape::Lines);
        assert_eq!(split.len(), 3);
        assert_eq!(split.units[1].text(), "three");
        assert_eq!(split.units[2].index(), 2);
        assert!(split.units.iter().all(|u| !u.is_terminator()));
    }

    #[test]
    fn test_split_text_on_newlines() {
        let split = split(&Document::from("a\nb c"));
        assert_eq!(
            split.shape,
            Shape::Text {
                breaks: vec!["\n".to_string()]
            }
        );
        let texts: Vec<_> = split.units.iter().map(Unit::text).collect();
        assert_eq!(texts, vec!["a", "b c"]);
    }

    #[test]
    fn test_spaces_do_not_split() {
        let split = split(&Document::from("one two three"));
        assert_eq!(split.len(), 1);
    }

    #[test]
    fn test_trailing_separator_gives_terminator() {
        let split = split(&Document::from("a\nb\n"));
        assert_eq!(split.len(), 3);
        assert!(split.units[2].is_terminator());
        assert_eq!(split.units[2].text(), "");
        assert!(!split.units[1].is_terminator());
    }

    #[test]
    fn test_crlf_is_remembered() {
        let split = split(&Document::from("a\r\nb"));
        assert_eq!(
            split.shape,
            Shape::Text {
                breaks: vec!["\r\n".to_string()]
            }
        );
        assert_eq!(split.units[0].text(), "a");
        assert_eq!(split.units[1].text(), "b");
    }

    #[test]
    fn test_empty_inputs() {
        let text = split(&Document::from(""));
        assert_eq!(text.len(), 1);
        assert!(!text.units[0].is_terminator());

        let lines = split(&Document::Lines(Vec::new()));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_mixed_line_breaks_are_kept_per_unit() {
        let split = split(&Document::from("a\r\nb\nc\r\n"));
        let texts: Vec<_> = split.units.iter().map(Unit::text).collect();
        assert_eq!(texts, vec!["a", "b", "c", ""]);
        assert!(split.units[3].is_terminator());
        assert_eq!(
            split.shape,
            Shape::Text {
                breaks: vec!["\r\n".to_string(), "\n".to_string(), "\r\n".to_string()]
            }
        );
    }

    #[test]
    fn test_lone_carriage_return_stays_in_text() {
        let split = split(&Document::from("a\rb\nc"));
        assert_eq!(split.units[0].text(), "a\rb");
    }

    #[test]
    fn test_empty_line_in_the_middle_is_regular() {
        let split = split(&Document::from("a\n\nb"));
        assert_eq!(split.len(), 3);
        assert!(!split.units[1].is_terminator());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_shapes() {
        let text: Document = serde_json::from_str("\"a\\nb\"").unwrap();
        assert_eq!(text, Document::from("a\nb"));

        let lines: Document = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(lines, Document::from(vec!["a", "b"]));
        assert_eq!(serde_json::to_string(&lines).unwrap(), "[\"a\",\"b\"]");
    }
}
