use std::io::Write;

use crate::error::{PrepareError, Result};
use crate::row::Row;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    /// Parses one input line.
    ///
    /// `insert <id> <username> <email>` or `select`; tokens are separated by
    /// ASCII whitespace and anything after the email is ignored. Text fields
    /// are taken as raw bytes.
    pub fn prepare(input: impl AsRef<[u8]>) -> std::result::Result<Self, PrepareError> {
        let input = input.as_ref();
        let mut parts = input
            .split(u8::is_ascii_whitespace)
            .filter(|part| !part.is_empty());

        match parts.next() {
            Some(b"insert") => {
                let (Some(id), Some(username), Some(email)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    return Err(PrepareError::Syntax);
                };

                Ok(Statement::Insert(Row::new(parse_id(id)?, username, email)?))
            }
            Some(b"select") => Ok(Statement::Select),
            _ => Err(PrepareError::Unrecognized(
                String::from_utf8_lossy(input).into_owned(),
            )),
        }
    }

    /// Runs the statement against `table`. `select` writes one line per row
    /// to `out`.
    pub fn execute<W: Write>(&self, table: &mut Table, out: &mut W) -> Result<()> {
        match self {
            Statement::Insert(row) => table.insert(row)?,
            Statement::Select => {
                for row in table.scan() {
                    writeln!(out, "{row}")?;
                }
            }
        }
        Ok(())
    }
}

/// Any `-` followed by digits is a negative id, however large; `-0` is 0.
fn parse_id(token: &[u8]) -> std::result::Result<u32, PrepareError> {
    let token = std::str::from_utf8(token).map_err(|_| PrepareError::Syntax)?;
    if let Some(digits) = token.strip_prefix('-') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PrepareError::Syntax);
        }
        if digits.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(PrepareError::NegativeId);
    }
    token.parse().map_err(|_| PrepareError::Syntax)
}
