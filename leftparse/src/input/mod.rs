//! Source text acquisition with size and encoding checks

use crate::config::compile_time::input::MAX_INPUT_SIZE;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Name given to text read from standard input
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Input not found: {path}")]
    NotFound { path: String },

    #[error("Input too large: {size} bytes (max: {max_size})")]
    TooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in input: {name}")]
    InvalidEncoding { name: String },

    #[error("I/O error reading {name}: {message}")]
    Io { name: String, message: String },
}

impl InputError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            InputError::NotFound { .. } => codes::input::INPUT_NOT_FOUND,
            InputError::TooLarge { .. } => codes::input::INPUT_TOO_LARGE,
            InputError::PermissionDenied { .. } => codes::input::PERMISSION_DENIED,
            InputError::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            InputError::Io { .. } => codes::input::IO_ERROR,
        }
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(name: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => InputError::NotFound {
                path: name.to_string(),
            },
            io::ErrorKind::PermissionDenied => InputError::PermissionDenied {
                path: name.to_string(),
            },
            _ => InputError::Io {
                name: name.to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Text to be parsed, with the name used in diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub name: String,
    pub text: String,
    /// Size in bytes
    pub size: u64,
}

impl SourceInput {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Wrap in-memory text
pub fn from_text(name: &str, text: impl Into<String>) -> Result<SourceInput, InputError> {
    from_text_with_limit(name, text.into(), MAX_INPUT_SIZE)
}

fn from_text_with_limit(name: &str, text: String, max_size: u64) -> Result<SourceInput, InputError> {
    let size = text.len() as u64;
    if size > max_size {
        return Err(fail(InputError::TooLarge { size, max_size }, name));
    }

    log_success!(codes::success::INPUT_LOADED, "Input loaded",
        "name" => name,
        "bytes" => size
    );

    Ok(SourceInput {
        name: name.to_string(),
        text,
        size,
    })
}

/// Read a file, rejecting it before reading when it is over the size limit
pub fn load_file(path: &Path) -> Result<SourceInput, InputError> {
    let name = path.display().to_string();
    log_debug!("Loading input file", "path" => name);

    let metadata = fs::metadata(path).map_err(|e| fail(InputError::from_io(&name, e), &name))?;
    if !metadata.is_file() {
        let error = InputError::Io {
            name: name.clone(),
            message: "not a regular file".to_string(),
        };
        return Err(fail(error, &name));
    }
    if metadata.len() > MAX_INPUT_SIZE {
        let error = InputError::TooLarge {
            size: metadata.len(),
            max_size: MAX_INPUT_SIZE,
        };
        return Err(fail(error, &name));
    }

    let file = fs::File::open(path).map_err(|e| fail(InputError::from_io(&name, e), &name))?;
    from_reader_with_limit(&name, file, MAX_INPUT_SIZE)
}

/// Read standard input to the end
pub fn read_stdin() -> Result<SourceInput, InputError> {
    from_reader(STDIN_NAME, io::stdin().lock())
}

/// Read any source to the end under the size limit
pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<SourceInput, InputError> {
    from_reader_with_limit(name, reader, MAX_INPUT_SIZE)
}

fn from_reader_with_limit<R: Read>(
    name: &str,
    reader: R,
    max_size: u64,
) -> Result<SourceInput, InputError> {
    let mut bytes = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| fail(InputError::from_io(name, e), name))?;

    let size = bytes.len() as u64;
    if size > max_size {
        return Err(fail(InputError::TooLarge { size, max_size }, name));
    }

    let text = String::from_utf8(bytes).map_err(|_| {
        fail(
            InputError::InvalidEncoding {
                name: name.to_string(),
            },
            name,
        )
    })?;

    from_text_with_limit(name, text, max_size)
}

fn fail(error: InputError, name: &str) -> InputError {
    log_error!(error.error_code(), &error.to_string(), "name" => name);
    error
}
