use std::path::Path;
use std::path::PathBuf;

use crate::BlocksError;
use crate::notices::Notices;
use crate::theme::ThemeLocator;

/// One logical directory and the block configuration files found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDirectory {
	/// The logical directory, e.g. `views/blocks`.
	pub id: String,
	/// Where the directory resolved to on disk.
	pub path: PathBuf,
	/// Configuration files directly inside `path`, sorted by file name.
	pub files: Vec<PathBuf>,
}

impl ScannedDirectory {
	/// `(directory, file)` pairs for every configuration file.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
		self.files.iter().map(|file| (self.id.as_str(), file))
	}
}

/// Resolve and list every directory in `directories`.
///
/// Scanning stops at the first directory that does not resolve; later
/// directories are not scanned even if they exist. A directory that resolves
/// but cannot be listed queues an error notice and stops the scan the same
/// way. Directories listed before the failure are still returned.
pub fn scan_directories(
	locator: &dyn ThemeLocator,
	directories: &[String],
	extension: &str,
	notices: &mut Notices,
) -> Vec<ScannedDirectory> {
	let mut scanned = Vec::new();

	for (index, directory) in directories.iter().enumerate() {
		let skipped = directories.len() - index - 1;
		let Some(path) = locator.locate(directory) else {
			tracing::warn!(
				directory = %directory,
				skipped,
				"block directory not found, skipping it and all directories after it"
			);
			break;
		};

		let files = match list_config_files(&path, extension) {
			Ok(files) => files,
			Err(error) => {
				tracing::warn!(
					directory = %directory,
					path = %path.display(),
					skipped,
					"block directory could not be listed, skipping it and all directories after it"
				);
				notices.error_for(&BlocksError::DirectoryRead {
					directory: directory.clone(),
					reason: error.to_string(),
				});
				break;
			}
		};

		tracing::debug!(directory = %directory, files = files.len(), "scanned block directory");
		scanned.push(ScannedDirectory {
			id: directory.clone(),
			path,
			files,
		});
	}

	scanned
}

/// Direct children of `dir` that are files with the given extension.
fn list_config_files(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if !path.is_file() {
			continue;
		}

		if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Flatten scanned directories into `(directory, file)` pairs.
pub fn scan_entries(scanned: &[ScannedDirectory]) -> Vec<(String, PathBuf)> {
	scanned
		.iter()
		.flat_map(ScannedDirectory::entries)
		.map(|(id, file)| (id.to_string(), file.clone()))
		.collect()
}
