use anyhow::{Context, Result};
use chrono::{Datelike, Timelike, Utc};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::escape::escape_text;
use crate::segmenter::Chapter;

/// Assembles an ordered chapter list into an EPUB container
///
/// Container layout: `mimetype` (first entry, stored uncompressed),
/// `META-INF/container.xml`, and under `OEBPS/` the package document, the NCX
/// navigation map, and one XHTML document per chapter.
pub struct EpubBuilder {
    title: String,
    language: String,
    identifier: String,
    chapters: Vec<Chapter>,
}

impl EpubBuilder {
    /// Create a builder for a book with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: "zh".to_string(),
            identifier: format!("urn:uuid:{}", Uuid::new_v4()),
            chapters: Vec::new(),
        }
    }

    /// Set the dc:language value (defaults to "zh")
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append one chapter in reading order
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Append chapters in reading order
    pub fn add_chapters(&mut self, chapters: impl IntoIterator<Item = Chapter>) {
        self.chapters.extend(chapters);
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Write the book to a file on disk
    pub fn write_to_file(&self, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
        self.write_to(file)?;
        let spine_len = self.chapters.iter().filter(|c| !c.body.is_empty()).count();
        eprintln!(
            "[epub] ✓ wrote {} ({} chapters)",
            output_path.display(),
            spine_len
        );
        Ok(())
    }

    /// Serialize the book into memory (bundle support and tests)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the full container to any seekable sink
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let now = chrono::Local::now();
        let timestamp = zip::DateTime::from_date_and_time(
            now.year() as u16,
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
        .unwrap_or_default();
        let stored: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(timestamp);
        let deflated: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(timestamp);

        // The mimetype entry must come first and must not be compressed.
        zip.start_file("mimetype", stored)
            .context("Failed to start mimetype entry")?;
        zip.write_all(b"application/epub+zip")
            .context("Failed to write mimetype")?;

        zip.start_file("META-INF/container.xml", deflated)
            .context("Failed to start container.xml")?;
        zip.write_all(CONTAINER_XML.as_bytes())
            .context("Failed to write container.xml")?;

        let spine = self.spine_chapters();
        for (index, chapter) in spine.iter().enumerate() {
            let name = format!("OEBPS/chap{}.xhtml", index + 1);
            zip.start_file(name.as_str(), deflated)
                .with_context(|| format!("Failed to start {name}"))?;
            zip.write_all(chapter_xhtml(chapter).as_bytes())
                .with_context(|| format!("Failed to write {name}"))?;
        }

        zip.start_file("OEBPS/toc.ncx", deflated)
            .context("Failed to start toc.ncx")?;
        zip.write_all(self.toc_ncx(&spine).as_bytes())
            .context("Failed to write toc.ncx")?;

        zip.start_file("OEBPS/content.opf", deflated)
            .context("Failed to start content.opf")?;
        zip.write_all(self.content_opf(&spine).as_bytes())
            .context("Failed to write content.opf")?;

        zip.finish().context("Failed to finalize EPUB archive")?;
        Ok(())
    }

    /// Chapters that make it into the spine
    ///
    /// A chapter with an empty body carries no readable content, so it is
    /// dropped at packaging time with a warning.
    fn spine_chapters(&self) -> Vec<&Chapter> {
        let mut spine = Vec::with_capacity(self.chapters.len());
        for chapter in &self.chapters {
            if chapter.body.is_empty() {
                eprintln!("[epub] skipping empty chapter: {}", chapter.title);
            } else {
                spine.push(chapter);
            }
        }
        spine
    }

    fn toc_ncx(&self, spine: &[&Chapter]) -> String {
        let nav_points: Vec<String> = spine
            .iter()
            .enumerate()
            .map(|(index, chapter)| {
                format!(
                    "    <navPoint id='chap{n}' playOrder='{n}'>\n      <navLabel><text>{title}</text></navLabel>\n      <content src='chap{n}.xhtml'/>\n    </navPoint>",
                    n = index + 1,
                    title = escape_text(&chapter.title),
                )
            })
            .collect();

        format!(
            "<?xml version='1.0' encoding='UTF-8'?>\n<ncx xmlns='http://www.daisy.org/z3986/2005/ncx/' version='2005-1'>\n  <head>\n    <meta name='dtb:uid' content='{identifier}'/>\n    <meta name='dtb:depth' content='1'/>\n    <meta name='dtb:totalPageCount' content='0'/>\n    <meta name='dtb:maxPageNumber' content='0'/>\n  </head>\n  <docTitle><text>{title}</text></docTitle>\n  <navMap>\n{nav_points}\n  </navMap>\n</ncx>\n",
            identifier = escape_text(&self.identifier),
            title = escape_text(&self.title),
            nav_points = nav_points.join("\n"),
        )
    }

    fn content_opf(&self, spine: &[&Chapter]) -> String {
        let manifest_items: Vec<String> = (1..=spine.len())
            .map(|n| {
                format!(
                    "    <item id='chap{n}' href='chap{n}.xhtml' media-type='application/xhtml+xml'/>"
                )
            })
            .collect();
        let spine_items: Vec<String> = (1..=spine.len())
            .map(|n| format!("    <itemref idref='chap{n}'/>"))
            .collect();
        let modified = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

        format!(
            "<?xml version='1.0' encoding='utf-8'?>\n<package xmlns='http://www.idpf.org/2007/opf' version='3.0' unique-identifier='BookId'>\n  <metadata xmlns:dc='http://purl.org/dc/elements/1.1/'>\n    <dc:title>{title}</dc:title>\n    <dc:language>{language}</dc:language>\n    <dc:identifier id='BookId'>{identifier}</dc:identifier>\n    <meta property='dcterms:modified'>{modified}</meta>\n  </metadata>\n  <manifest>\n    <item id='ncx' href='toc.ncx' media-type='application/x-dtbncx+xml'/>\n{manifest}\n  </manifest>\n  <spine toc='ncx'>\n{spine}\n  </spine>\n</package>\n",
            title = escape_text(&self.title),
            language = escape_text(&self.language),
            identifier = escape_text(&self.identifier),
            modified = modified,
            manifest = manifest_items.join("\n"),
            spine = spine_items.join("\n"),
        )
    }
}

const CONTAINER_XML: &str = "<?xml version='1.0' encoding='utf-8'?>\n<container version='1.0' xmlns='urn:oasis:names:tc:opendocument:xmlns:container'>\n  <rootfiles>\n    <rootfile full-path='OEBPS/content.opf' media-type='application/oebps-package+xml'/>\n  </rootfiles>\n</container>\n";

/// Render one chapter as an XHTML document, one paragraph per body line
fn chapter_xhtml(chapter: &Chapter) -> String {
    let title = escape_text(&chapter.title);
    let paragraphs: Vec<String> = chapter
        .body
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("    <p>{}</p>", escape_text(line)))
        .collect();

    format!(
        "<?xml version='1.0' encoding='utf-8'?>\n<html xmlns=\"http://www.w3.org/1999/xhtml\">\n  <head>\n    <title>{title}</title>\n  </head>\n  <body>\n    <h2>{title}</h2>\n{paragraphs}\n  </body>\n</html>\n",
        title = title,
        paragraphs = paragraphs.join("\n"),
    )
}
