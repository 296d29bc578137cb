use std::io::{self, Write};

use crate::table::Table;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE};

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Constants,
    Unrecognized(String),
}

impl MetaCommand {
    /// Returns `None` when `input` is not a meta-command at all.
    pub fn parse(input: &str) -> Option<MetaCommand> {
        match input {
            ".exit" => Some(MetaCommand::Exit),
            ".constants" => Some(MetaCommand::Constants),
            _ if input.starts_with('.') => Some(MetaCommand::Unrecognized(input.to_string())),
            _ => None,
        }
    }
}

pub fn print_constants<W: Write>(table: &Table, out: &mut W) -> io::Result<()> {
    writeln!(out, "Constants:")?;
    writeln!(out, "ROW_SIZE: {ROW_SIZE}")?;
    writeln!(out, "PAGE_SIZE: {PAGE_SIZE}")?;
    writeln!(out, "ROWS_PER_PAGE: {ROWS_PER_PAGE}")?;
    writeln!(out, "TABLE_MAX_PAGES: {}", table.max_pages())?;
    writeln!(out, "TABLE_MAX_ROWS: {}", table.max_rows())
}
