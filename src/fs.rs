//! Filesystem boundary for packing and unpacking
//!
//! Reads input files into memory, hands them to the archive core and writes
//! the results back out. Missing inputs are skipped per file; unpacking decodes
//! every entry before anything is written.

use crate::archive::{self, ArchiveWriter};
use crate::common::EntryStats;
use crate::{Result, SarchError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Component, Path, PathBuf};

/// An input file read into memory
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Name stored in the archive (final path component)
    pub name: String,
    /// File contents
    pub data: Vec<u8>,
}

/// An input that could not be packed
#[derive(Debug)]
pub struct SkippedFile {
    /// Path as given by the caller
    pub path: PathBuf,
    /// Why it was skipped
    pub error: SarchError,
}

/// A file stored in the archive
#[derive(Debug, Clone)]
pub struct PackedFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Name stored in the archive
    pub name: String,
    /// Compression sizes
    pub stats: EntryStats,
}

/// Outcome of [`pack_files`]
#[derive(Debug, Default)]
pub struct PackReport {
    /// Files written to the archive, in order
    pub packed: Vec<PackedFile>,
    /// Inputs that were skipped
    pub skipped: Vec<SkippedFile>,
    /// Size of the archive file
    pub archive_size: u64,
}

/// Read every path, separating readable files from skipped ones
///
/// A file whose name is already taken by an earlier input is skipped with
/// `DuplicateEntryName`, since unpacking would write both to the same path.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> (Vec<InputFile>, Vec<SkippedFile>) {
    let mut collector = InputCollector::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        collector.push(path, read_input(path));
    }
    collector.finish()
}

/// Sorts read results into stored inputs and skipped paths
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    names: HashSet<String>,
    inputs: Vec<InputFile>,
    skipped: Vec<SkippedFile>,
}

impl InputCollector {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            names: HashSet::with_capacity(capacity),
            inputs: Vec::with_capacity(capacity),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, path: &Path, result: Result<InputFile>) {
        let error = match result {
            Ok(input) if self.names.insert(input.name.clone()) => {
                self.inputs.push(input);
                return;
            }
            Ok(input) => SarchError::DuplicateEntryName(input.name),
            Err(error) => error,
        };
        log::warn!("Skipping {}: {}", path.display(), error);
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            error,
        });
    }

    pub(crate) fn finish(self) -> (Vec<InputFile>, Vec<SkippedFile>) {
        (self.inputs, self.skipped)
    }
}

fn read_input(path: &Path) -> Result<InputFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SarchError::InvalidEntryName(path.display().to_string()))?
        .to_string();
    let data = fs::read(path)?;
    Ok(InputFile {
        path: path.to_path_buf(),
        name,
        data,
    })
}

/// Pack the existing files among `paths` into a new archive at `output`
///
/// Each file is stored under its file name. Inputs that cannot be read are
/// reported in [`PackReport::skipped`]; the header counts only the files
/// actually stored.
pub fn pack_files<P: AsRef<Path>, Q: AsRef<Path>>(paths: &[P], output: Q) -> Result<PackReport> {
    let (inputs, skipped) = collect_inputs(paths);
    let count = u32::try_from(inputs.len())
        .map_err(|_| SarchError::LimitExceeded(format!("{} input files", inputs.len())))?;

    let (packed, archive_size) =
        write_replacing(output.as_ref(), |file| -> Result<(Vec<PackedFile>, u64)> {
            let mut writer = ArchiveWriter::new(file, count)?;
            let mut packed = Vec::with_capacity(inputs.len());
            for input in inputs {
                let stats = writer.add_entry(&input.name, &input.data)?;
                packed.push(PackedFile {
                    path: input.path,
                    name: input.name,
                    stats,
                });
            }
            let archive_size = writer.bytes_written();
            writer.finish()?;
            Ok((packed, archive_size))
        })?;

    log::info!(
        "Created {} with {} entries ({} bytes)",
        output.as_ref().display(),
        packed.len(),
        archive_size
    );

    Ok(PackReport {
        packed,
        skipped,
        archive_size,
    })
}

/// Write `output` through `write`, replacing it only if `write` succeeds
///
/// Data goes to a `.partial` file next to `output`, which is renamed over
/// `output` on success and removed on failure. An existing `output` is left
/// untouched when writing fails.
pub fn write_replacing<T, E, F>(output: &Path, write: F) -> std::result::Result<T, E>
where
    E: From<io::Error>,
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<T, E>,
{
    let partial = partial_path(output)?;
    let result = File::create(&partial)
        .map_err(E::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            let value = write(&mut writer)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            Ok(value)
        })
        .and_then(|value| {
            fs::rename(&partial, output)?;
            Ok(value)
        });

    if result.is_err() {
        // Nothing useful to report if the partial file is already gone
        let _ = fs::remove_file(&partial);
    }
    result
}

/// Sibling path used while `output` is being written
pub(crate) fn partial_path(output: &Path) -> io::Result<PathBuf> {
    let name = output.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a file path", output.display()),
        )
    })?;
    let mut partial = name.to_os_string();
    partial.push(".partial");
    Ok(output.with_file_name(partial))
}

/// Path inside `output_dir` for entry `name`
///
/// # Errors
/// Returns `InvalidEntryName` unless `name` is a single plain path component.
pub fn output_path(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    ) && !name.contains(['/', '\\', '\0']);

    if !valid {
        return Err(SarchError::InvalidEntryName(name.to_string()));
    }
    Ok(output_dir.join(name))
}

/// Decode every entry of `data` and pair it with its output path
///
/// # Errors
/// Besides decoding errors, returns `InvalidEntryName` for a name that is not
/// a plain file name and `DuplicateEntryName` when two entries share a name.
pub fn plan_unpack(data: &[u8], output_dir: &Path) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    let mut seen = HashSet::new();
    archive::unpack(data)?
        .into_iter()
        .map(|(name, bytes)| {
            let path = output_path(output_dir, &name)?;
            if !seen.insert(path.clone()) {
                return Err(SarchError::DuplicateEntryName(name));
            }
            Ok((path, bytes))
        })
        .collect()
}

/// Unpack the archive at `archive_path` into `output_dir`
///
/// All entries are decoded and their names checked before the directory is
/// created or any file is written. Returns the written paths in archive order.
pub fn unpack_files<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
) -> Result<Vec<PathBuf>> {
    let data = fs::read(archive_path.as_ref())?;
    let output_dir = output_dir.as_ref();
    let files = plan_unpack(&data, output_dir)?;

    fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        fs::write(&path, &bytes)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        written.push(path);
    }

    log::info!(
        "Unpacked {} entries into {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_accepts_plain_names() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "a.txt").unwrap(), dir.join("a.txt"));
        assert_eq!(output_path(dir, ".hidden").unwrap(), dir.join(".hidden"));
    }

    #[test]
    fn test_output_path_rejects_escapes() {
        let dir = Path::new("out");
        for name in ["", ".", "..", "../x", "a/b", "/etc/passwd", "a\\b", "./a", "a\0b"] {
            assert!(
                matches!(output_path(dir, name), Err(SarchError::InvalidEntryName(_))),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_plan_unpack_rejects_duplicate_names() {
        let data = archive::pack(&[("a.txt", b"first"), ("a.txt", b"again")]).unwrap();
        let err = plan_unpack(&data, Path::new("out")).unwrap_err();
        assert!(matches!(err, SarchError::DuplicateEntryName(name) if name == "a.txt"));
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("dir/out.sarch")).unwrap(),
            Path::new("dir/out.sarch.partial")
        );
        assert!(partial_path(Path::new("..")).is_err());
    }
}
