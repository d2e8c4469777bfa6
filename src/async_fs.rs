//! Async filesystem boundary
//!
//! Same behavior as [`crate::fs`], with file reads and writes done through
//! `tokio::fs`. Compression itself runs inline on the calling task; files are
//! processed one after another.

#[cfg(feature = "async")]
/// Tokio-based pack and unpack
pub mod tokio_fs {
    use crate::archive::ArchiveWriter;
    use crate::fs::{partial_path, plan_unpack, InputCollector, InputFile, PackReport, PackedFile};
    use crate::{Result, SarchError};
    use std::path::{Path, PathBuf};
    use tokio::io::AsyncWriteExt;

    async fn read_input(path: &Path) -> Result<InputFile> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SarchError::InvalidEntryName(path.display().to_string()))?
            .to_string();
        let data = tokio::fs::read(path).await?;
        Ok(InputFile {
            path: path.to_path_buf(),
            name,
            data,
        })
    }

    /// Pack the existing files among `paths` into a new archive at `output`
    pub async fn pack_files<P: AsRef<Path>, Q: AsRef<Path>>(
        paths: &[P],
        output: Q,
    ) -> Result<PackReport> {
        let mut collector = InputCollector::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let result = read_input(path).await;
            collector.push(path, result);
        }
        let (inputs, skipped) = collector.finish();

        let count = u32::try_from(inputs.len())
            .map_err(|_| SarchError::LimitExceeded(format!("{} input files", inputs.len())))?;
        let mut writer = ArchiveWriter::new(Vec::new(), count)?;
        let mut packed = Vec::with_capacity(inputs.len());
        for input in inputs {
            let stats = writer.add_entry(&input.name, &input.data)?;
            packed.push(PackedFile {
                path: input.path,
                name: input.name,
                stats,
            });
        }
        let archive = writer.finish()?;

        let output = output.as_ref();
        let partial = partial_path(output)?;
        if let Err(e) = write_and_rename(&partial, output, &archive).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        log::info!(
            "Created {} with {} entries ({} bytes)",
            output.display(),
            packed.len(),
            archive.len()
        );

        Ok(PackReport {
            packed,
            skipped,
            archive_size: archive.len() as u64,
        })
    }

    async fn write_and_rename(partial: &Path, output: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(partial).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        tokio::fs::rename(partial, output).await
    }

    /// Unpack the archive at `archive_path` into `output_dir`
    ///
    /// Nothing is written unless every entry decodes.
    pub async fn unpack_files<P: AsRef<Path>, Q: AsRef<Path>>(
        archive_path: P,
        output_dir: Q,
    ) -> Result<Vec<PathBuf>> {
        let data = tokio::fs::read(archive_path.as_ref()).await?;
        let output_dir = output_dir.as_ref();
        let files = plan_unpack(&data, output_dir)?;

        tokio::fs::create_dir_all(output_dir).await?;
        let mut written = Vec::with_capacity(files.len());
        for (path, bytes) in files {
            tokio::fs::write(&path, &bytes).await?;
            written.push(path);
        }
        Ok(written)
    }

}

#[cfg(feature = "async")]
pub use tokio_fs::{pack_files, unpack_files};
