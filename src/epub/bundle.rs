use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack already-generated books into a single zip archive
///
/// `books` pairs an archive entry name (e.g. `novel.epub`) with the book's
/// serialized bytes. EPUB payloads are zip archives themselves, so entries
/// are stored without recompression.
pub fn bundle_books(output_path: &Path, books: &[(String, Vec<u8>)]) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create bundle: {}", output_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, bytes) in books {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to start bundle entry: {name}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("Failed to write bundle entry: {name}"))?;
    }

    zip.finish().context("Failed to finalize bundle archive")?;
    eprintln!(
        "[epub] ✓ bundled {} books into {}",
        books.len(),
        output_path.display()
    );
    Ok(())
}
