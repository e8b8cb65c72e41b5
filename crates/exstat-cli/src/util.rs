use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination of a command's result.
struct Output {
    writer: Box<dyn Write>,
    /// Shown in error messages.
    name: String,
}

impl Output {
    fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                name: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            name: path.display().to_string(),
        })
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.finish_line()
    }

    fn write_text<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Display + ?Sized,
    {
        write!(self.writer, "{value}")
            .with_context(|| format!("Failed to write to {}", self.name))?;
        self.finish_line()
    }

    fn finish_line(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer).with_context(|| format!("Failed to write to {}", self.name))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.name))
    }
}

/// Where and how a command prints its result.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OutputArg {
    /// Print the result as JSON instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl OutputArg {
    pub fn emit<T>(&self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + Display + ?Sized,
    {
        let mut output = Output::open(self.output.as_deref())?;
        if self.json {
            output.write_json(value)?;
        } else {
            output.write_text(value)?;
        }
        if let Some(path) = &self.output {
            eprintln!("Wrote result to {}", path.display());
        }
        Ok(())
    }
}
