//! Main entry point for the memunzip CLI application.
//!
//! Loads an archive from a local path or HTTP URL into memory, then lists
//! its entries or prints their contents.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use memunzip::zip::DEFAULT_CHUNK_SIZE;
use memunzip::{ArchiveSource, Cli, HttpSource, LocalFileSource, ZipArchive, ZipError, ZipFileEntry};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the appropriate source
/// based on whether the input is a local file or HTTP URL.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    memunzip::logger::init(cli.log_level());

    if cli.is_http_url() {
        let source = HttpSource::new(cli.file.clone())?;
        process_source(&source, &cli).await?;

        if !cli.is_quiet() {
            eprintln!(
                "\nTotal bytes transferred: {}",
                format_size(source.transferred_bytes())
            );
        }
    } else {
        let source = LocalFileSource::new(Path::new(&cli.file));
        process_source(&source, &cli).await?;
    }

    Ok(())
}

/// Load the archive and either list it or print the selected entries.
///
/// A failure on one entry is reported and the remaining entries are still
/// processed; the overall result is an error if anything failed.
async fn process_source<S: ArchiveSource>(source: &S, cli: &Cli) -> Result<()> {
    let bytes = source.load().await?;
    let archive = ZipArchive::new(bytes)
        .with_context(|| format!("cannot open {}", source.describe()))?;

    if cli.list || cli.verbose {
        list_files(&archive, cli.verbose);
        return Ok(());
    }

    let selected = select_entries(archive.list_entries(), cli);

    // Report plain names that matched nothing
    for name in cli.names.iter().filter(|n| !has_glob_chars(n)) {
        if archive.by_name(name).is_none() && !selected.iter().any(|e| matches_name(name, e)) {
            log::warn!("filename not matched: {}", name);
        }
    }

    let show_banner = !cli.pipe || selected.len() > 1;
    let mut failed = 0usize;
    for entry in &selected {
        if let Err(e) = print_entry(&archive, entry, cli, show_banner).await {
            failed += 1;
            match e.downcast_ref::<ZipError>() {
                Some(zip_err) if zip_err.is_unsupported() => {
                    log::warn!("skipping {}: {}", entry.file_name, zip_err)
                }
                _ => log::error!("{}: {:#}", entry.file_name, e),
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} entries could not be extracted", failed, selected.len());
    }

    Ok(())
}

/// Apply the positional name filters and `-x` exclusions.
///
/// Directory entries are skipped; they carry no content.
fn select_entries<'a>(entries: &'a [ZipFileEntry], cli: &Cli) -> Vec<&'a ZipFileEntry> {
    entries
        .iter()
        .filter(|e| !e.is_directory)
        .filter(|e| cli.names.is_empty() || cli.names.iter().any(|n| matches_name(n, e)))
        .filter(|e| {
            !cli
                .exclude
                .iter()
                .any(|x| e.file_name.contains(x.as_str()) || glob_match(x, &e.file_name))
        })
        .collect()
}

/// Match a requested name against an entry: glob, full path or basename.
fn matches_name(name: &str, entry: &ZipFileEntry) -> bool {
    if has_glob_chars(name) {
        return glob_match(name, &entry.file_name);
    }
    let basename = entry
        .file_name
        .rsplit('/')
        .next()
        .unwrap_or(&entry.file_name);
    entry.file_name == name || basename == name
}

/// List entries in the archive.
///
/// Simple format (`-l`) prints names only; verbose (`-v`) prints a table
/// with sizes, ratio, method, timestamp and CRC.
fn list_files(archive: &ZipArchive, verbose: bool) {
    if !verbose {
        for entry in archive.list_entries() {
            println!("{}", entry.file_name);
        }
        return;
    }

    println!(
        "{:>10}  {:>6}  {:>10}  {:>5}  {:>16}  {:>8}  Name",
        "Length", "Method", "Size", "Cmpr", "Date Time", "CRC-32"
    );
    println!("{}", "-".repeat(80));

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in archive.list_entries() {
        let timestamp = entry
            .last_modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "----------  -----".to_string());

        println!(
            "{:>10}  {:>6}  {:>10}  {}  {:>16}  {:08x}  {}{}",
            entry.uncompressed_size,
            entry.compression_method.name(),
            entry.compressed_size,
            ratio(entry.compressed_size, entry.uncompressed_size),
            timestamp,
            entry.crc32,
            entry.file_name,
            if entry.encrypted { " (encrypted)" } else { "" }
        );

        if !entry.is_directory {
            total_uncompressed += entry.uncompressed_size;
            total_compressed += entry.compressed_size;
            file_count += 1;
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "{:>10}  {:>6}  {:>10}  {}  {:>26}  {} files",
        total_uncompressed,
        "",
        total_compressed,
        ratio(total_compressed, total_uncompressed),
        "",
        file_count
    );

    if !archive.comment().is_empty() {
        println!("\n{}", archive.comment());
    }
}

/// Compression ratio as percentage saved
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Extract one entry to stdout.
///
/// Pipe mode (`-p`) streams raw bytes chunk by chunk; otherwise the entry
/// is decoded as (lossy) UTF-8 text and printed under a banner.
async fn print_entry(
    archive: &ZipArchive,
    entry: &ZipFileEntry,
    cli: &Cli,
    show_banner: bool,
) -> Result<()> {
    let reader = archive.extract_entry(entry)?;
    let mut stdout = tokio::io::stdout();

    if show_banner {
        stdout
            .write_all(format!("--- {} ---\n", entry.file_name).as_bytes())
            .await?;
    }

    if cli.pipe {
        for chunk in reader.chunks(DEFAULT_CHUNK_SIZE) {
            stdout.write_all(&chunk?).await?;
        }
    } else {
        let data = reader.read_to_vec()?;
        let text = String::from_utf8_lossy(&data);
        stdout.write_all(text.as_bytes()).await?;
        if !text.is_empty() && !text.ends_with('\n') {
            stdout.write_all(b"\n").await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star: skip it, or consume one character and keep it
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
