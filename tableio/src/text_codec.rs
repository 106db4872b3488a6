//! ASCII table files
//!
//! Decoding locates the block `double|float <name>(<rows>,<cols>)` and reads
//! exactly `rows * cols` numbers from the lines after it, row-major. Rows
//! may wrap across lines and several rows may share a line.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tableio_core::text::{
    is_blank_or_comment, number_tokens, HEADER_DELIMITERS, SIGNATURE,
};
use tableio_core::{is_number, parse_number, ElementKind, Signature, Table, TextTableHeader};

use crate::config::TableConfig;
use crate::error::{Result, TableIoError};
use crate::line_reader::LineReader;
use crate::report::Reporter;

/// Header of one table block, as listed from a file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextTableInfo {
    pub kind: ElementKind,
    pub name: String,
    pub rows: u64,
    pub cols: u64,
    /// Line number of the header
    pub line: u64,
}

/// Read the table `name` from a text table file
pub fn read_text_table<R: Reporter>(
    path: &Path,
    name: &str,
    config: &TableConfig,
    reporter: &R,
) -> Result<Table> {
    let file_name = path.display().to_string();
    let file = File::open(path).map_err(|e| TableIoError::open(&file_name, &e))?;
    decode_text_table(BufReader::new(file), &file_name, name, config, reporter)
}

/// Decode the table `name` from a text table stream
///
/// `source` names the stream in diagnostics.
pub fn decode_text_table<B: BufRead, R: Reporter>(
    reader: B,
    source: &str,
    name: &str,
    config: &TableConfig,
    reporter: &R,
) -> Result<Table> {
    let mut lines = LineReader::with_capacity(reader, config.line_buffer_capacity);
    check_signature(&mut lines, source)?;

    while let Some(line) = lines.next_line()? {
        let Some(header) = TextTableHeader::parse_for(line, name) else {
            continue;
        };
        let (rows, cols) = (header.rows, header.cols);
        tracing::debug!(file = source, table = name, rows, cols, "found table header");
        let block = TableBlock {
            name,
            source,
            rows,
            cols,
        };
        return block.decode(&mut lines, reporter);
    }

    Err(TableIoError::TableNotFound {
        name: name.to_string(),
        file: source.to_string(),
    })
}

fn check_signature<B: BufRead>(lines: &mut LineReader<B>, source: &str) -> Result<()> {
    let Some(first) = lines.next_line()? else {
        return Err(TableIoError::FirstLineEof {
            file: source.to_string(),
        });
    };
    match Signature::check(first) {
        Signature::Valid => Ok(()),
        found => Err(TableIoError::BadSignature {
            file: source.to_string(),
            found,
        }),
    }
}

/// A located header whose body is about to be read
struct TableBlock<'a> {
    name: &'a str,
    source: &'a str,
    rows: u64,
    cols: u64,
}

impl TableBlock<'_> {
    fn decode<B: BufRead, R: Reporter>(
        &self,
        lines: &mut LineReader<B>,
        reporter: &R,
    ) -> Result<Table> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TableIoError::ZeroDimension {
                name: self.name.to_string(),
                rows: self.rows,
                cols: self.cols,
                file: self.source.to_string(),
            });
        }
        let rows = usize::try_from(self.rows).map_err(|_| TableIoError::Allocation)?;
        let cols = usize::try_from(self.cols).map_err(|_| TableIoError::Allocation)?;
        let total = rows.checked_mul(cols).ok_or(TableIoError::Allocation)?;

        let mut data: Vec<f64> = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| TableIoError::Allocation)?;

        // A trailing comment on the last data line closes the table
        let mut closed_by_comment = false;
        while data.len() < total {
            let Some((line_no, line)) = lines.next_numbered_line()? else {
                return Err(self.unexpected_eof());
            };
            if is_blank_or_comment(line) {
                continue;
            }
            closed_by_comment = false;
            for token in number_tokens(line) {
                if token.starts_with('#') {
                    closed_by_comment = true;
                    break;
                }
                if data.len() == total {
                    // Quota filled but the line goes on
                    return Err(if is_number(token) {
                        self.size_mismatch(line_no)
                    } else {
                        self.parse_error(line_no)
                    });
                }
                let parsed = parse_number(token);
                if !parsed.fully_consumed {
                    return Err(self.parse_error(line_no));
                }
                data.push(parsed.value);
            }
        }

        if !closed_by_comment {
            self.check_trailing_rows(lines, reporter)?;
        }
        Table::new(rows, cols, data).map_err(|e| TableIoError::container(self.source, e))
    }

    /// Warn when the next content line still looks like table data
    fn check_trailing_rows<B: BufRead, R: Reporter>(
        &self,
        lines: &mut LineReader<B>,
        reporter: &R,
    ) -> Result<()> {
        while let Some((line_no, line)) = lines.next_numbered_line()? {
            if is_blank_or_comment(line) {
                continue;
            }
            if let Some(token) = number_tokens(line).next() {
                if !token.starts_with('#') && is_number(token) {
                    let warning = self.size_mismatch(line_no);
                    tracing::debug!(file = self.source, table = self.name, line = line_no, "surplus table rows");
                    reporter.warning(&warning.to_string());
                }
            }
            break;
        }
        Ok(())
    }

    fn unexpected_eof(&self) -> TableIoError {
        TableIoError::UnexpectedEof {
            name: self.name.to_string(),
            rows: self.rows,
            cols: self.cols,
            file: self.source.to_string(),
        }
    }

    fn parse_error(&self, line: u64) -> TableIoError {
        TableIoError::Parse {
            line,
            name: self.name.to_string(),
            rows: self.rows,
            cols: self.cols,
            file: self.source.to_string(),
        }
    }

    fn size_mismatch(&self, line: u64) -> TableIoError {
        TableIoError::DeclaredSizeMismatch {
            name: self.name.to_string(),
            rows: self.rows,
            cols: self.cols,
            file: self.source.to_string(),
            line,
        }
    }
}

/// List the headers of all tables in a text table file
pub fn list_text_tables(path: &Path) -> Result<Vec<TextTableInfo>> {
    let file_name = path.display().to_string();
    let file = File::open(path).map_err(|e| TableIoError::open(&file_name, &e))?;
    let mut lines = LineReader::new(BufReader::new(file));
    check_signature(&mut lines, &file_name)?;

    let mut tables = Vec::new();
    while let Some((line_no, line)) = lines.next_numbered_line()? {
        if let Some(header) = TextTableHeader::parse(line) {
            tables.push(TextTableInfo {
                kind: header.kind,
                name: header.name.to_string(),
                rows: header.rows,
                cols: header.cols,
                line: line_no,
            });
        }
    }
    Ok(tables)
}

/// Write tables to a text table file
///
/// With `append` and an existing file, the blocks are added after the
/// existing content; otherwise the file is created with the `#1` signature.
/// Values are written in the shortest form that reads back exactly.
pub fn write_text_table<'a, I>(path: &Path, tables: I, append: bool) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a Table)>,
{
    let file_name = path.display().to_string();
    let mut out = if append && path.exists() {
        let existing =
            std::fs::read_to_string(path).map_err(|e| TableIoError::open(&file_name, &e))?;
        let first = existing.lines().next().ok_or_else(|| TableIoError::FirstLineEof {
            file: file_name.clone(),
        })?;
        let found = Signature::check(first);
        if found != Signature::Valid {
            return Err(TableIoError::BadSignature {
                file: file_name,
                found,
            });
        }
        let mut out = existing;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    } else {
        format!("{SIGNATURE}\n")
    };

    for (name, table) in tables {
        if !is_valid_table_name(name) || table.is_absent() {
            return Err(TableIoError::Write {
                name: name.to_string(),
                file: file_name,
                source: None,
            });
        }
        encode_block(&mut out, name, table);
    }

    crate::persist::replace_file(path, out.as_bytes()).map_err(|e| TableIoError::Write {
        name: String::new(),
        file: file_name.clone(),
        source: Some(e),
    })?;
    tracing::debug!(file = %file_name, append, "wrote text tables");
    Ok(())
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('#')
        && !name.contains(HEADER_DELIMITERS)
        && !name.contains('\n')
}

fn encode_block(out: &mut String, name: &str, table: &Table) {
    // Writing into a String never fails
    let _ = writeln!(
        out,
        "{} {}({},{})",
        ElementKind::Double,
        name,
        table.rows(),
        table.cols()
    );
    for row in table.iter_rows() {
        for (k, value) in row.iter().enumerate() {
            if k > 0 {
                out.push('\t');
            }
            let _ = write!(out, "{value:?}");
        }
        out.push('\n');
    }
}
