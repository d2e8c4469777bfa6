//! sarch - Command-line interface for SARCH archives
//!
//! A command-line tool for packing files into and unpacking files from the
//! SARCH format.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use sarch::fs::{collect_inputs, plan_unpack, write_replacing};
use sarch::{ArchiveReader, ArchiveWriter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sarch")]
#[command(about = "A simple RLE + Huffman multi-file archiver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files into a new archive
    Pack {
        /// Output archive
        output: PathBuf,

        /// Files to pack; missing files are skipped
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Force overwrite of the output archive
        #[arg(short, long)]
        force: bool,
    },

    /// Unpack an archive into a directory
    Unpack {
        /// Archive to unpack
        archive: PathBuf,

        /// Destination directory
        #[arg(default_value = "extracted")]
        output_dir: PathBuf,

        /// Force overwrite of existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the entries of an archive
    List {
        /// Archive to inspect
        archive: PathBuf,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pack {
            output,
            files,
            force,
        } => pack_archive(&files, &output, force, cli.verbose, cli.quiet),
        Commands::Unpack {
            archive,
            output_dir,
            force,
        } => unpack_archive(&archive, &output_dir, force, cli.verbose, cli.quiet),
        Commands::List { archive } => list_archive(&archive, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn progress_bar(
    len: usize,
    message: &'static str,
) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    Ok(pb)
}

fn pack_archive(
    files: &[PathBuf],
    output: &Path,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    let start_time = Instant::now();
    let (inputs, skipped) = collect_inputs(files);

    if !quiet {
        for skip in &skipped {
            eprintln!("Skipping '{}': {}", skip.path.display(), skip.error);
        }
    }
    if inputs.is_empty() {
        return Err("No input files could be read".into());
    }

    let progress = if !quiet && inputs.len() > 1 {
        Some(progress_bar(inputs.len(), "Packing...")?)
    } else {
        None
    };

    let count = u32::try_from(inputs.len())?;
    let (input_size, output_size) = write_replacing(output, |file| -> CliResult<(usize, u64)> {
        let mut writer = ArchiveWriter::new(file, count)?;
        let mut input_size = 0usize;

        for input in &inputs {
            let stats = writer
                .add_entry(&input.name, &input.data)
                .map_err(|e| format!("Packing '{}' failed: {}", input.path.display(), e))?;
            input_size += stats.original_size;

            if verbose {
                let line = format!(
                    "  {}: {} -> {} bytes ({:.1}%)",
                    input.name,
                    stats.original_size,
                    stats.table_size + stats.payload_size,
                    stats.ratio()
                );
                match &progress {
                    Some(pb) => pb.println(line),
                    None => println!("{line}"),
                }
            }
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        let output_size = writer.bytes_written();
        writer.finish()?;
        Ok((input_size, output_size))
    })?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Packing complete");
    }

    if !quiet {
        let ratio = if input_size > 0 {
            (output_size as f64 / input_size as f64) * 100.0
        } else {
            0.0
        };
        println!("✓ Archive created: {}", output.display());
        println!("  Entries: {}", inputs.len());
        println!("  Input:   {} bytes", input_size);
        println!("  Output:  {} bytes", output_size);
        println!("  Ratio:   {:.1}%", ratio);
        println!("  Time:    {:.2?}", start_time.elapsed());

        if ratio > 100.0 {
            println!("  Note: Archive is larger than its inputs (common for small or varied data)");
        }
    }

    Ok(())
}

fn unpack_archive(
    archive: &Path,
    output_dir: &Path,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !archive.exists() {
        return Err(format!("Archive '{}' does not exist", archive.display()).into());
    }

    let start_time = Instant::now();
    let data = fs::read(archive)?;
    let files = plan_unpack(&data, output_dir)?;

    if !force {
        if let Some((path, _)) = files.iter().find(|(path, _)| path.exists()) {
            return Err(format!(
                "Output file '{}' already exists. Use --force to overwrite",
                path.display()
            )
            .into());
        }
    }

    let progress = if !quiet && files.len() > 1 {
        Some(progress_bar(files.len(), "Unpacking...")?)
    } else {
        None
    };

    fs::create_dir_all(output_dir)?;
    let mut output_size = 0usize;
    for (path, bytes) in &files {
        fs::write(path, bytes)?;
        output_size += bytes.len();

        if verbose {
            let line = format!("  {} ({} bytes)", path.display(), bytes.len());
            match &progress {
                Some(pb) => pb.println(line),
                None => println!("{line}"),
            }
        }
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = progress {
        pb.finish_with_message("Unpacking complete");
    }

    if !quiet {
        println!("✓ Unpacked into {}", output_dir.display());
        println!("  Entries: {}", files.len());
        println!("  Input:   {} bytes", data.len());
        println!("  Output:  {} bytes", output_size);
        println!("  Time:    {:.2?}", start_time.elapsed());
    }

    Ok(())
}

fn list_archive(archive: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !archive.exists() {
        return Err(format!("Archive '{}' does not exist", archive.display()).into());
    }

    let data = fs::read(archive)?;
    let mut reader = ArchiveReader::new(data.as_slice())?;

    println!("SARCH Archive Information:");
    println!("  File: {}", archive.display());
    println!("  Size: {} bytes", data.len());
    println!("  Entries: {}", reader.entry_count());

    let mut index = 0;
    while let Some(entry) = reader.next_raw() {
        let entry = entry?;
        let stored = entry.code_table.len() + entry.payload.len();
        if verbose {
            match entry.decompress() {
                Ok(bytes) => println!(
                    "  [{index}] {}: {} bytes stored, {} bytes original",
                    entry.name,
                    stored,
                    bytes.len()
                ),
                Err(e) => println!("  [{index}] {}: ✗ {}", entry.name, e),
            }
        } else {
            println!("  [{index}] {}: {} bytes stored", entry.name, stored);
        }
        index += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.bin");
        let archive = dir.path().join("test.sarch");
        let output_dir = dir.path().join("out");

        fs::write(&first, b"Hello, World! This is a test of the SARCH CLI tool.")?;
        fs::write(&second, [0u8; 1000])?;

        pack_archive(&[first, second], &archive, false, false, true)?;
        unpack_archive(&archive, &output_dir, false, false, true)?;

        assert_eq!(
            fs::read(output_dir.join("first.txt"))?,
            b"Hello, World! This is a test of the SARCH CLI tool."
        );
        assert_eq!(fs::read(output_dir.join("second.bin"))?, vec![0u8; 1000]);

        // Second unpack refuses to overwrite without --force
        assert!(unpack_archive(&archive, &output_dir, false, false, true).is_err());
        unpack_archive(&archive, &output_dir, true, false, true)?;

        Ok(())
    }

    #[test]
    fn test_pack_refuses_existing_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input = dir.path().join("a.txt");
        let archive = dir.path().join("a.sarch");
        fs::write(&input, b"abc")?;
        fs::write(&archive, b"existing")?;

        assert!(pack_archive(&[input.clone()], &archive, false, false, true).is_err());
        pack_archive(&[input], &archive, true, false, true)?;
        list_archive(&archive, true)?;
        Ok(())
    }
}
