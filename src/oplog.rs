//! CSV operation logs.
//!
//! A log has the header `op,key,value,index` and one command per row:
//!
//! ```text
//! op,key,value,index
//! insert,fred,123,
//! upsert,fred,124,
//! get_index,,,0
//! erase,fred,,
//! ```

use std::io::Read;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::command::Command;

/// Errors raised while reading an operation log.
#[derive(Debug, Error)]
pub enum OpLogError {
    /// The CSV layer could not read or decode a record.
    #[error("malformed record at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// The `op` column names no known command.
    #[error("unknown op {op:?} at line {line}")]
    UnknownOp { line: u64, op: String },

    /// The `index` column holds something other than an integer.
    #[error("index {index:?} at line {line} is not an integer")]
    BadIndex { line: u64, index: String },

    /// A column the command needs was left empty.
    #[error("op {op} at line {line} requires a {field}")]
    MissingField {
        line: u64,
        op: &'static str,
        field: &'static str,
    },
}

/// One raw row of an operation log.
#[derive(Debug, Deserialize)]
pub struct OpRow {
    pub op: String,
    pub key: Option<String>,
    pub value: Option<String>,
    pub index: Option<String>,
}

impl OpRow {
    /// Convert the raw row to a typed command.
    ///
    /// `line` is only used for error messages. A negative index, or one too
    /// large for `usize`, becomes `usize::MAX`, which every map rejects as
    /// out of range.
    pub fn to_command(&self, line: u64) -> Result<Command<String, String>, OpLogError> {
        let key = |op| {
            self.key.clone().ok_or(OpLogError::MissingField {
                line,
                op,
                field: "key",
            })
        };
        let value = |op| {
            self.value.clone().ok_or(OpLogError::MissingField {
                line,
                op,
                field: "value",
            })
        };

        let cmd = match self.op.trim().to_ascii_lowercase().as_str() {
            "insert" => Command::Insert {
                key: key("insert")?,
                value: value("insert")?,
            },
            "update" => Command::Update {
                key: key("update")?,
                value: value("update")?,
            },
            "upsert" | "insert_or_update" => Command::InsertOrUpdate {
                key: key("upsert")?,
                value: value("upsert")?,
            },
            "erase" => Command::Erase { key: key("erase")? },
            "get" => Command::Get { key: key("get")? },
            "get_index" => {
                let raw = self.index.as_deref().ok_or(OpLogError::MissingField {
                    line,
                    op: "get_index",
                    field: "index",
                })?;
                Command::GetIndex {
                    index: parse_index(raw, line)?,
                }
            }
            "clear" => Command::Clear,
            _ => {
                return Err(OpLogError::UnknownOp {
                    line,
                    op: self.op.clone(),
                })
            }
        };
        Ok(cmd)
    }
}

/// Parse an ordinal, saturating anything unrepresentable to `usize::MAX`.
fn parse_index(raw: &str, line: u64) -> Result<usize, OpLogError> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OpLogError::BadIndex {
            line,
            index: raw.to_string(),
        });
    }
    if negative && digits.bytes().any(|b| b != b'0') {
        return Ok(usize::MAX);
    }
    // Only overflow can fail here
    Ok(digits.parse().unwrap_or(usize::MAX))
}

/// Line a csv error points at, or 0 when it carries no position.
fn error_line(err: &csv::Error) -> u64 {
    err.position().map_or(0, |pos| pos.line())
}

/// Parse a whole operation log, stopping at the first bad row.
///
/// Line numbers in errors are where the offending record starts, so a
/// quoted field spanning several lines does not shift later reports.
pub fn read_commands<R: Read>(reader: R) -> Result<Vec<Command<String, String>>, OpLogError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv
        .headers()
        .map_err(|source| OpLogError::Csv {
            line: error_line(&source),
            source,
        })?
        .clone();
    let mut commands = Vec::new();

    for record in csv.records() {
        let record = record.map_err(|source| OpLogError::Csv {
            line: error_line(&source),
            source,
        })?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: OpRow = record
            .deserialize(Some(&headers))
            .map_err(|source| OpLogError::Csv { line, source })?;
        commands.push(row.to_command(line)?);
    }

    debug!(commands = commands.len(), "operation log parsed");
    Ok(commands)
}
