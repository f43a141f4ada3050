use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

pub mod cipapi;

#[derive(Debug)]
pub enum InputError {
    Io(std::io::Error),
    MissingInput(String),
    Parse(String),
    Http { url: String, message: String },
    Status { url: String, status: u16 },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "IO error: {e}"),
            InputError::MissingInput(msg) => write!(f, "missing input: {msg}"),
            InputError::Parse(msg) => write!(f, "parse error: {msg}"),
            InputError::Http { url, message } => write!(f, "request to {url} failed: {message}"),
            InputError::Status { url, status } => write!(f, "{url} returned HTTP {status}"),
        }
    }
}

impl std::error::Error for InputError {}

impl From<std::io::Error> for InputError {
    fn from(value: std::io::Error) -> Self {
        InputError::Io(value)
    }
}

/// Where an interpretation request document comes from.
pub trait RequestSource {
    fn describe(&self) -> String;

    /// The request body exactly as stored or served.
    fn fetch(&self) -> Result<String, InputError>;
}

#[derive(Debug, Clone)]
pub struct LocalFileSource {
    pub path: PathBuf,
}

impl RequestSource for LocalFileSource {
    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }

    fn fetch(&self) -> Result<String, InputError> {
        read_request_text(&self.path)
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads a request file, decompressing `.gz` files.
pub fn read_request_text(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "interpretation request file {} not found",
            path.display()
        )));
    }
    let mut text = String::new();
    open_maybe_gz(path)?.read_to_string(&mut text)?;
    Ok(text)
}

/// `origin` names the body in parse errors.
pub fn parse_request_json(text: &str, origin: &str) -> Result<serde_json::Value, InputError> {
    serde_json::from_str(text).map_err(|e| InputError::Parse(format!("{origin}: {e}")))
}

pub fn load_request_json(path: &Path) -> Result<serde_json::Value, InputError> {
    let text = read_request_text(path)?;
    parse_request_json(&text, &path.display().to_string())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
