use super::*;
use crate::segmenter::Chapter;
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn chapter(title: &str, body: &str) -> Chapter {
    Chapter {
        title: title.to_string(),
        body: body.to_string(),
    }
}

fn build_archive(builder: &EpubBuilder) -> ZipArchive<Cursor<Vec<u8>>> {
    let bytes = builder.to_bytes().unwrap();
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut entry = archive.by_name(name).unwrap();
    let mut contents = String::new();
    entry.read_to_string(&mut contents).unwrap();
    contents
}

#[test]
fn test_mimetype_is_first_and_uncompressed() {
    let mut builder = EpubBuilder::new("書名");
    builder.add_chapter(chapter("第一章", "內文。"));
    let mut archive = build_archive(&builder);

    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    drop(first);

    assert_eq!(read_entry(&mut archive, "mimetype"), "application/epub+zip");
}

#[test]
fn test_container_points_at_package_document() {
    let mut builder = EpubBuilder::new("書名");
    builder.add_chapter(chapter("第一章", "內文。"));
    let mut archive = build_archive(&builder);

    let container = read_entry(&mut archive, "META-INF/container.xml");
    assert!(container.contains("full-path='OEBPS/content.opf'"));
}

#[test]
fn test_one_xhtml_document_per_chapter() {
    let mut builder = EpubBuilder::new("書名");
    builder.add_chapters([
        chapter("第一章", "第一段。\n第二段。"),
        chapter("第二章", "後續。"),
    ]);
    let mut archive = build_archive(&builder);

    let chap1 = read_entry(&mut archive, "OEBPS/chap1.xhtml");
    assert!(chap1.contains("<h2>第一章</h2>"));
    assert!(chap1.contains("<p>第一段。</p>"));
    assert!(chap1.contains("<p>第二段。</p>"));

    let chap2 = read_entry(&mut archive, "OEBPS/chap2.xhtml");
    assert!(chap2.contains("<h2>第二章</h2>"));

    let opf = read_entry(&mut archive, "OEBPS/content.opf");
    assert!(opf.contains("<dc:title>書名</dc:title>"));
    assert!(opf.contains("<itemref idref='chap1'/>"));
    assert!(opf.contains("<itemref idref='chap2'/>"));
    assert!(opf.contains("urn:uuid:"));

    let ncx = read_entry(&mut archive, "OEBPS/toc.ncx");
    assert!(ncx.contains("<text>第一章</text>"));
    assert!(ncx.contains("src='chap2.xhtml'"));
}

#[test]
fn test_empty_body_chapter_dropped_from_spine() {
    let mut builder = EpubBuilder::new("書名");
    builder.add_chapters([
        chapter("第一章", "內文。"),
        chapter("空章", ""),
        chapter("第三章", "結尾。"),
    ]);
    let mut archive = build_archive(&builder);

    // The empty chapter is skipped; the survivors renumber densely.
    let chap2 = read_entry(&mut archive, "OEBPS/chap2.xhtml");
    assert!(chap2.contains("<h2>第三章</h2>"));
    assert!(archive.by_name("OEBPS/chap3.xhtml").is_err());
}

#[test]
fn test_titles_and_paragraphs_are_escaped() {
    let mut builder = EpubBuilder::new("Tom & Jerry <3");
    builder.add_chapter(chapter("A & B", "1 < 2 \"quoted\""));
    let mut archive = build_archive(&builder);

    let opf = read_entry(&mut archive, "OEBPS/content.opf");
    assert!(opf.contains("<dc:title>Tom &amp; Jerry &lt;3</dc:title>"));

    let chap1 = read_entry(&mut archive, "OEBPS/chap1.xhtml");
    assert!(chap1.contains("<h2>A &amp; B</h2>"));
    assert!(chap1.contains("<p>1 &lt; 2 &quot;quoted&quot;</p>"));
}

#[test]
fn test_escape_text_handles_all_entities() {
    assert_eq!(
        escape_text(r#"<a href="x">&'quote'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&apos;quote&apos;&lt;/a&gt;"
    );
    assert_eq!(escape_text("第一章"), "第一章");
}

#[test]
fn test_bundle_contains_every_book() {
    let mut a = EpubBuilder::new("甲");
    a.add_chapter(chapter("第一章", "甲文。"));
    let mut b = EpubBuilder::new("乙");
    b.add_chapter(chapter("第一章", "乙文。"));

    let books = vec![
        ("jia.epub".to_string(), a.to_bytes().unwrap()),
        ("yi.epub".to_string(), b.to_bytes().unwrap()),
    ];

    let dir = std::env::temp_dir().join("txt2epub_bundle_test");
    std::fs::create_dir_all(&dir).unwrap();
    let bundle_path = dir.join("books.zip");
    bundle_books(&bundle_path, &books).unwrap();

    let file = std::fs::File::open(&bundle_path).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.by_name("jia.epub").is_ok());
    assert!(archive.by_name("yi.epub").is_ok());

    std::fs::remove_dir_all(&dir).ok();
}
