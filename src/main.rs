use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use txt2epub::{
    bundle_books, decoder, DocumentSession, EpubBuilder, SegmentationConfig, DEFAULT_ENCODINGS,
};

#[derive(Parser)]
#[command(name = "txt2epub", version, about = "Convert plain-text novels into EPUB books")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text files into EPUB books
    Convert {
        /// Input .txt files, or directories to scan for them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the generated books
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Merge all inputs into a single book with this title
        #[arg(long, value_name = "TITLE")]
        merge: Option<String>,

        /// Bundle the generated books into one zip archive
        #[arg(long, value_name = "FILE")]
        bundle: Option<PathBuf>,

        #[command(flatten)]
        segmentation: SegmentationArgs,
    },
    /// Preview detected chapters without writing a book
    Inspect {
        /// Input .txt file
        input: PathBuf,

        /// Case-insensitive title filter
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,

        /// Print the body of chapter N (1-based)
        #[arg(long, value_name = "N")]
        show: Option<usize>,

        #[command(flatten)]
        segmentation: SegmentationArgs,
    },
}

#[derive(Args)]
struct SegmentationArgs {
    /// Heading pattern, tested in order (repeatable); defaults to the
    /// built-in Chinese chapter patterns
    #[arg(long = "pattern", value_name = "REGEX")]
    patterns: Vec<String>,

    /// JSON file with segmentation settings (flags override it)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Longest line (in chars) still considered a chapter heading
    #[arg(long, value_name = "N")]
    max_title_length: Option<usize>,

    /// Literal keyword stripped from detected titles (repeatable)
    #[arg(long = "remove", value_name = "KEYWORD")]
    cleanup: Vec<String>,

    /// Candidate encoding, tried in order (repeatable)
    #[arg(long = "encoding", value_name = "LABEL")]
    encodings: Vec<String>,
}

impl SegmentationArgs {
    /// Resolve flags and config file into one immutable snapshot
    fn resolve(&self) -> Result<(SegmentationConfig, Vec<String>)> {
        let mut config = match &self.config {
            Some(path) => SegmentationConfig::from_json_file(path)?,
            None => SegmentationConfig::default(),
        };
        if !self.patterns.is_empty() {
            config.patterns = self.patterns.clone();
        }
        if let Some(limit) = self.max_title_length {
            config.max_title_length = limit;
        }
        if !self.cleanup.is_empty() {
            config.cleanup_keywords = self.cleanup.clone();
        }

        // A malformed pattern must fail here, before any document is read.
        config.compile_matcher()?;

        let encodings = if self.encodings.is_empty() {
            DEFAULT_ENCODINGS.iter().map(|l| l.to_string()).collect()
        } else {
            self.encodings.clone()
        };
        // Same for an unknown encoding label.
        decoder::decode_with_candidates(&[], &encodings)
            .context("Invalid encoding candidate list")?;

        Ok((config, encodings))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Convert {
            inputs,
            out_dir,
            merge,
            bundle,
            segmentation,
        } => run_convert(&inputs, &out_dir, merge, bundle, &segmentation),
        Command::Inspect {
            input,
            search,
            show,
            segmentation,
        } => run_inspect(&input, search.as_deref(), show, &segmentation),
    }
}

fn run_convert(
    inputs: &[PathBuf],
    out_dir: &Path,
    merge: Option<String>,
    bundle: Option<PathBuf>,
    segmentation: &SegmentationArgs,
) -> Result<()> {
    let (config, encodings) = segmentation.resolve()?;
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        bail!("No .txt input files found");
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    if let Some(book_title) = merge {
        // One book out of the whole batch; any failed input aborts the merge
        // rather than silently shipping a partial book.
        let mut builder = EpubBuilder::new(book_title.as_str());
        for path in &files {
            let session = segment_file(path, &config, &encodings)?;
            builder.add_chapters(session.into_chapters());
        }
        let output_path = out_dir.join(format!("{book_title}.epub"));
        builder.write_to_file(&output_path)?;
        return Ok(());
    }

    let mut generated: Vec<(String, Vec<u8>)> = Vec::new();
    let mut failed = 0usize;
    for path in &files {
        match convert_one(path, &config, &encodings) {
            Ok((name, builder)) => {
                if bundle.is_some() {
                    generated.push((name, builder.to_bytes()?));
                } else {
                    builder.write_to_file(&out_dir.join(&name))?;
                }
            }
            Err(err) => {
                // One bad document must not sink the rest of the batch.
                eprintln!("[convert] ✗ {}: {:#}", path.display(), err);
                failed += 1;
            }
        }
    }

    if let Some(bundle_path) = bundle {
        if generated.is_empty() {
            bail!("No books generated, nothing to bundle");
        }
        bundle_books(&bundle_path, &generated)?;
    }

    if failed > 0 {
        bail!("{failed} of {} documents failed", files.len());
    }
    Ok(())
}

fn convert_one(
    path: &Path,
    config: &SegmentationConfig,
    encodings: &[String],
) -> Result<(String, EpubBuilder)> {
    let session = segment_file(path, config, encodings)?;
    let name = format!("{}.epub", session.default_title());
    let mut builder = EpubBuilder::new(session.default_title());
    builder.add_chapters(session.into_chapters());
    Ok((name, builder))
}

fn segment_file(
    path: &Path,
    config: &SegmentationConfig,
    encodings: &[String],
) -> Result<DocumentSession> {
    let mut session = DocumentSession::load(path, config.clone(), encodings)?;
    session.segment()?;
    eprintln!(
        "[convert] {}: {} chapters ({})",
        path.display(),
        session.chapters().len(),
        session.encoding()
    );
    Ok(session)
}

fn run_inspect(
    input: &Path,
    search: Option<&str>,
    show: Option<usize>,
    segmentation: &SegmentationArgs,
) -> Result<()> {
    let (config, encodings) = segmentation.resolve()?;
    let session = segment_file(input, &config, &encodings)?;
    let chapters = session.chapters();

    if let Some(number) = show {
        let chapter = chapters
            .get(number.wrapping_sub(1))
            .with_context(|| format!("No chapter {number} (document has {})", chapters.len()))?;
        println!("{}", chapter.title);
        println!();
        println!("{}", chapter.body);
        return Ok(());
    }

    let indices: Vec<usize> = match search {
        Some(query) => session.search(query),
        None => (0..chapters.len()).collect(),
    };
    for index in &indices {
        println!("{:>4}. {}", index + 1, chapters[*index].title);
    }
    if let Some(query) = search {
        eprintln!(
            "[inspect] {} of {} chapter titles match {query:?}",
            indices.len(),
            chapters.len()
        );
    }
    Ok(())
}

/// Expand file and directory arguments into a flat list of .txt files
fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to scan directory: {}", input.display()))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}
