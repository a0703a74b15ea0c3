use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use mkplot_series::DefaultsFile;
use mkplot_stat::ResultTable;

/// Destination of command results: stdout, or a file if a path is given.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Write a value as pretty JSON to a file, or to stdout
    ///
    /// # Arguments
    ///
    /// * `value` - Value to serialize
    /// * `output_path` - Destination file; stdout if `None`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    /// Open the destination of a command's results
    ///
    /// # Errors
    ///
    /// Returns error if `output_path` is given and cannot be created
    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path.to_owned()),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    /// Create (or truncate) the file at `path`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Write `value` as pretty JSON followed by a newline, then flush
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the underlying write fails
    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        self.finish()
    }

    /// Write a result table in its on-disk layout
    ///
    /// The table is written as `{preamble, stats}` JSON indented by four
    /// spaces, the same layout [`ResultTable::write`] produces.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the underlying write fails
    pub fn write_table(&mut self, table: &ResultTable) -> anyhow::Result<()> {
        table
            .to_writer(&mut *self)
            .with_context(|| format!("Failed to write result table to {}", self.display_path()))?;
        self.finish()
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Read and deserialize a JSON file
///
/// # Arguments
///
/// * `file_kind` - What the file holds, used in error messages
/// * `path` - Path to the JSON file
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read plot defaults from a JSON file with a `settings` object
///
/// # Arguments
///
/// * `path` - Path to the defaults file
///
/// # Returns
///
/// Deserialized defaults; missing settings take their default values
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_defaults_file<P>(path: P) -> anyhow::Result<DefaultsFile>
where
    P: AsRef<Path>,
{
    read_json_file("defaults", path)
}

/// Parses a command-line argument given as inline JSON.
pub fn parse_json<T>(arg: &str) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(arg)
}
