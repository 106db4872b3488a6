//! ASCII table file grammar
//!
//! ```text
//! #1
//! double tab1(3,2)   # comment
//!   0   0
//!   1   1.5
//!   2   4
//! float tab2(1,4)
//!   1,2;3 4
//! ```
//!
//! The first line carries the format signature. A table starts with a
//! header line `<kind> <name>(<rows>,<cols>)` and continues with `rows`
//! data rows. `#` starts a comment that runs to the end of the line.

/// Signature expected at the start of the first line
pub const SIGNATURE: &str = "#1";

/// Delimiters between header tokens
pub const HEADER_DELIMITERS: &[char] = &[' ', '\t', '(', ',', ')', '\r'];

/// Delimiters between numbers in a data row
pub const NUMBER_DELIMITERS: &[char] = &[' ', '\t', ',', ';', '\r'];

/// Outcome of checking the first line of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// Line starts with `#1`
    Valid,
    /// Line is empty
    Empty,
    /// Line has a single character
    Single(char),
    /// Line starts with two other characters
    Mismatch(char, char),
}

impl Signature {
    /// Classify the first line of a file
    pub fn check(line: &str) -> Self {
        if line.starts_with(SIGNATURE) {
            return Signature::Valid;
        }
        let mut chars = line.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Signature::Empty,
            (Some(c0), None) => Signature::Single(c0),
            (Some(c0), Some(c1)) => Signature::Mismatch(c0, c1),
        }
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Signature::Valid => write!(f, "\"{SIGNATURE}\""),
            Signature::Empty => write!(f, "\"{SIGNATURE}\" expected."),
            Signature::Single(c0) => write!(f, "\"{SIGNATURE}\" expected, but \"{c0}\" found."),
            Signature::Mismatch(c0, c1) => {
                write!(f, "\"{SIGNATURE}\" expected, but \"{c0}{c1}\" found.")
            }
        }
    }
}

/// Declared element type of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Double,
    Float,
}

impl ElementKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "double" => Some(ElementKind::Double),
            "float" => Some(ElementKind::Float),
            _ => None,
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            ElementKind::Double => "double",
            ElementKind::Float => "float",
        }
    }
}

impl core::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed table header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTableHeader<'a> {
    pub kind: ElementKind,
    pub name: &'a str,
    pub rows: u64,
    pub cols: u64,
}

impl<'a> TextTableHeader<'a> {
    /// Parse any well-formed header line
    pub fn parse(line: &'a str) -> Option<Self> {
        Self::parse_matching(line, |_| true)
    }

    /// Parse a header line only if it declares the table `name`
    ///
    /// The dimensions of other tables are never looked at, so a header of a
    /// different table with bad dimensions does not matter.
    pub fn parse_for(line: &'a str, name: &str) -> Option<Self> {
        Self::parse_matching(line, |candidate| candidate == name)
    }

    fn parse_matching(line: &'a str, accept: impl Fn(&str) -> bool) -> Option<Self> {
        let mut tokens = header_tokens(line);
        let kind = ElementKind::from_keyword(tokens.next()?)?;
        let name = tokens.next()?;
        if !accept(name) {
            return None;
        }
        let rows = parse_dimension(tokens.next()?)?;
        let cols = parse_dimension(tokens.next()?)?;
        Some(Self {
            kind,
            name,
            rows,
            cols,
        })
    }
}

fn parse_dimension(token: &str) -> Option<u64> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Split a header line into tokens
pub fn header_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(HEADER_DELIMITERS).filter(|t| !t.is_empty())
}

/// Split a data row into number tokens
pub fn number_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(NUMBER_DELIMITERS).filter(|t| !t.is_empty())
}

/// Whether a data line is empty or a comment
///
/// Only spaces and tabs count as leading white space.
pub fn is_blank_or_comment(line: &str) -> bool {
    let rest = line.trim_start_matches(&[' ', '\t'][..]);
    rest.is_empty() || rest.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_check() {
        assert_eq!(Signature::check("#1"), Signature::Valid);
        assert_eq!(Signature::check("#1 tables"), Signature::Valid);
        assert_eq!(Signature::check(""), Signature::Empty);
        assert_eq!(Signature::check("#"), Signature::Single('#'));
        assert_eq!(Signature::check("#2"), Signature::Mismatch('#', '2'));
        assert_eq!(Signature::check("double"), Signature::Mismatch('d', 'o'));
    }

    #[test]
    fn test_signature_messages() {
        assert_eq!(Signature::Empty.to_string(), "\"#1\" expected.");
        assert_eq!(
            Signature::Single('x').to_string(),
            "\"#1\" expected, but \"x\" found."
        );
        assert_eq!(
            Signature::Mismatch('#', '2').to_string(),
            "\"#1\" expected, but \"#2\" found."
        );
    }

    #[test]
    fn test_header_parse() {
        let header = TextTableHeader::parse("double tab1(6,2)").unwrap();
        assert_eq!(header.kind, ElementKind::Double);
        assert_eq!(header.name, "tab1");
        assert_eq!((header.rows, header.cols), (6, 2));

        let header = TextTableHeader::parse("float  T ( 3 , 4 )\r").unwrap();
        assert_eq!(header.kind, ElementKind::Float);
        assert_eq!((header.rows, header.cols), (3, 4));

        // Trailing tokens are ignored
        assert!(TextTableHeader::parse("double t(1,1) # note").is_some());
    }

    #[test]
    fn test_header_rejects_malformed() {
        assert!(TextTableHeader::parse("int t(1,1)").is_none());
        assert!(TextTableHeader::parse("double t(1)").is_none());
        assert!(TextTableHeader::parse("double t(a,1)").is_none());
        assert!(TextTableHeader::parse("double t(1,2x)").is_none());
        assert!(TextTableHeader::parse("double t(-1,2)").is_none());
        assert!(TextTableHeader::parse("").is_none());
    }

    #[test]
    fn test_header_parse_for_skips_other_names() {
        assert!(TextTableHeader::parse_for("double other(x,y)", "t").is_none());
        assert!(TextTableHeader::parse_for("double t(2,2)", "T").is_none());
        assert_eq!(
            TextTableHeader::parse_for("double t(2,3)", "t").map(|h| (h.rows, h.cols)),
            Some((2, 3))
        );
    }

    #[test]
    fn test_number_tokens() {
        let tokens: Vec<&str> = number_tokens("  1, 2;3\t4 \r").collect();
        assert_eq!(tokens, ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_blank_or_comment() {
        assert!(is_blank_or_comment(""));
        assert!(is_blank_or_comment(" \t "));
        assert!(is_blank_or_comment("  # comment"));
        assert!(!is_blank_or_comment(" 1 2"));
    }
}
