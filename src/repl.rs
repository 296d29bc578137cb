//! Read-eval-print loop: prompt, read a line, run it, repeat.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{DbError, Result, TableError};
use crate::meta::{self, MetaCommand};
use crate::statement::Statement;
use crate::table::Table;

const PROMPT: &str = "db > ";

// Raw bytes: text fields are stored verbatim whatever their encoding.
struct InputBuffer {
    buffer: Vec<u8>,
}

impl InputBuffer {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Returns `false` once the input is exhausted.
    fn read_input<R: BufRead>(&mut self, input: &mut R) -> Result<bool> {
        self.buffer.clear();
        Ok(input.read_until(b'\n', &mut self.buffer)? != 0)
    }

    fn line(&self) -> &[u8] {
        self.buffer.trim_ascii()
    }
}

enum Flow {
    Continue,
    Exit,
}

pub struct Repl {
    table: Table,
}

impl Repl {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Runs until `.exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut input_buffer = InputBuffer::new();

        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            if !input_buffer.read_input(&mut input)? {
                debug!("end of input");
                break;
            }

            if let Flow::Exit = self.handle_line(input_buffer.line(), &mut output)? {
                break;
            }
        }

        output.flush()?;
        Ok(())
    }

    fn handle_line<W: Write>(&mut self, line: &[u8], output: &mut W) -> Result<Flow> {
        if let Some(command) = MetaCommand::parse(&String::from_utf8_lossy(line)) {
            match command {
                MetaCommand::Exit => return Ok(Flow::Exit),
                MetaCommand::Constants => meta::print_constants(&self.table, output)?,
                MetaCommand::Unrecognized(input) => {
                    writeln!(output, "Unrecognized command '{input}'.")?
                }
            }
            return Ok(Flow::Continue);
        }

        let statement = match Statement::prepare(line) {
            Ok(statement) => statement,
            Err(err) => {
                writeln!(output, "{err}")?;
                return Ok(Flow::Continue);
            }
        };

        match statement.execute(&mut self.table, output) {
            Ok(()) => writeln!(output, "Executed.")?,
            Err(DbError::Table(TableError::Full { .. })) => writeln!(output, "Error: Table full.")?,
            Err(err) => return Err(err),
        }
        Ok(Flow::Continue)
    }
}
