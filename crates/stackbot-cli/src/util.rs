use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use stackbot_engine::Field;
use stackbot_search::{SearchConfig, WeightModel, WeightVector};

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
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

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

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
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

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;

    Ok(value)
}

/// Reads a field drawn as ASCII art (`#` filled, `.` empty), aligned to the bottom.
pub fn read_field_file<P>(path: P) -> anyhow::Result<Field>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let art = fs::read_to_string(path)
        .with_context(|| format!("Failed to read field file: {}", path.display()))?;
    Field::parse_ascii(&art).with_context(|| format!("Invalid field file: {}", path.display()))
}

pub fn read_config_file<P>(path: P) -> anyhow::Result<SearchConfig>
where
    P: AsRef<Path>,
{
    read_json_file("search config", path)
}

pub fn read_weight_model_file<P>(path: P) -> anyhow::Result<WeightVector>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let model: WeightModel = read_json_file("weight model", path)?;
    let weights = model
        .to_weight_vector()
        .with_context(|| format!("Invalid weight model: {}", path.display()))?;
    eprintln!(
        "Loaded weight model {} (trained at {})",
        model.name, model.trained_at
    );
    Ok(weights)
}
