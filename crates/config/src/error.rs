//! Error types for configuration loading.
//!
//! Only structural failures are errors. A missing key or a value that does not
//! parse is reported as an absent value by the section readers instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when locating, loading or indexing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A required argument was empty or otherwise unusable.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The directory that should contain the configuration file does not exist.
	#[error("directory not found: {}", .0.display())]
	DirectoryNotFound(PathBuf),

	/// The configuration file does not exist at load time.
	#[error("file not found: {}", .0.display())]
	FileNotFound(PathBuf),

	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", .path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A dynamic section was requested by a position that does not exist.
	#[error("dynamic section index {index} out of range (count: {count})")]
	DynamicIndexOutOfRange {
		/// Requested position.
		index: usize,
		/// Number of dynamic sections currently loaded.
		count: usize,
	},

	/// A section-name pattern handed to a factory table failed to compile.
	#[error("invalid section pattern: {0}")]
	InvalidPattern(#[from] regex::Error),
}

impl ConfigError {
	/// Maps an I/O error for `path`, turning `NotFound` into [`ConfigError::FileNotFound`].
	pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
		if error.kind() == std::io::ErrorKind::NotFound {
			ConfigError::FileNotFound(path.to_path_buf())
		} else {
			ConfigError::Io {
				path: path.to_path_buf(),
				error,
			}
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
