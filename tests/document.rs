// tests/document.rs
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use kama_sona_scrape::Error;
use kama_sona_scrape::config::options::{AssembleOptions, SizePolicy};
use kama_sona_scrape::document::ods::{self, MIMETYPE};
use kama_sona_scrape::document::{self, EmphasisStyle, ImageSize};
use kama_sona_scrape::specs::kama_sona::ScrapedRecord;
use tempfile::TempDir;
use url::Url;
use zip::{CompressionMethod, ZipArchive};

const SVG_48: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="24"><rect width="48" height="24"/></svg>"#;

fn record(index: usize, file: &str, raw_text: &str) -> ScrapedRecord {
    ScrapedRecord {
        index,
        image_url: Url::parse(&format!("https://example.org/img/{file}")).unwrap(),
        raw_text: raw_text.into(),
    }
}

/// Temp workspace with an `images/` dir holding the named SVG files.
fn workspace(files: &[&str]) -> (TempDir, AssembleOptions) {
    let tmp = TempDir::new().unwrap();
    let images = tmp.path().join("images");
    fs::create_dir_all(&images).unwrap();
    for f in files {
        fs::write(images.join(f), SVG_48).unwrap();
    }
    let opts = AssembleOptions {
        images_dir: images,
        out_path: tmp.path().join("kama sona.ods"),
        editable_dir: None,
        size: SizePolicy::default(),
    };
    (tmp, opts)
}

fn zip_entry(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut out = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

fn count(hay: &str, needle: &str) -> usize {
    hay.matches(needle).count()
}

#[test]
fn writes_header_plus_one_row_per_record_in_order() {
    let (_tmp, opts) = workspace(&["kili.svg", "jan.svg"]);
    let records = vec![
        record(0, "kili.svg", "kili <em>moku</em> pona"),
        record(1, "jan.svg", "jan"),
    ];

    let summary = document::assemble(&records, &opts, &EmphasisStyle::default(), None).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.document, opts.out_path);

    let content = zip_entry(&opts.out_path, "content.xml");
    assert_eq!(count(&content, "<table:table-row>"), 3);
    assert!(content.contains(r#"table:name="kama sona data""#));
    assert!(content.contains("Column 1") && content.contains("Column 2"));

    let kili = content.find("kili").unwrap();
    let jan = content.find(">jan<").unwrap();
    assert!(kili < jan);

    assert!(content.contains(
        r#"kili <text:span text:style-name="EmphasizedTextColor">moku</text:span> pona"#
    ));
    assert!(content.contains(r##"<style:text-properties fo:color="#FFA500"/>"##));

    assert_eq!(count(&content, "<draw:frame"), 2);
    assert!(content.contains(r#"svg:width="50px" svg:height="50px""#));
    assert!(content.contains(r#"xlink:href="Pictures/0001.svg""#));
    assert!(content.contains(r#"xlink:href="Pictures/0002.svg""#));
}

#[test]
fn package_layout_is_valid_ods() {
    let (_tmp, opts) = workspace(&["kili.svg"]);
    document::assemble(&[record(0, "kili.svg", "kili")], &opts, &EmphasisStyle::default(), None).unwrap();

    let mut archive = ZipArchive::new(fs::File::open(&opts.out_path).unwrap()).unwrap();
    {
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut mime = String::new();
        first.read_to_string(&mut mime).unwrap();
        assert_eq!(mime, MIMETYPE);
    }
    assert_eq!(
        zip_entry(&opts.out_path, "Pictures/0001.svg"),
        SVG_48,
        "image bytes are embedded unchanged"
    );
    let manifest = zip_entry(&opts.out_path, "META-INF/manifest.xml");
    assert!(manifest.contains(r#"manifest:full-path="Pictures/0001.svg" manifest:media-type="image/svg+xml""#));
}

#[test]
fn no_records_gives_header_only() {
    let (_tmp, opts) = workspace(&[]);
    let summary = document::assemble(&[], &opts, &EmphasisStyle::default(), None).unwrap();
    assert_eq!(summary.rows, 0);
    let content = zip_entry(&opts.out_path, "content.xml");
    assert_eq!(count(&content, "<table:table-row>"), 1);
    assert!(!content.contains("<draw:frame"));
}

#[test]
fn missing_local_image_is_an_error() {
    let (_tmp, opts) = workspace(&["kili.svg"]);
    let records = vec![record(0, "kili.svg", "kili"), record(1, "absent.svg", "weka")];
    match document::assemble(&records, &opts, &EmphasisStyle::default(), None) {
        Err(Error::MissingImage(p)) => assert!(p.ends_with("absent.svg")),
        other => panic!("expected MissingImage, got {:?}", other.map(|s| s.rows)),
    }
    assert!(!opts.out_path.exists());
}

#[test]
fn existing_output_is_replaced() {
    let (_tmp, opts) = workspace(&["kili.svg"]);
    fs::write(&opts.out_path, b"stale").unwrap();
    document::assemble(&[record(0, "kili.svg", "kili")], &opts, &EmphasisStyle::default(), None).unwrap();
    assert!(zip_entry(&opts.out_path, "content.xml").contains("kili"));
}

#[test]
fn detected_size_comes_from_the_svg() {
    let (_tmp, mut opts) = workspace(&["kili.svg"]);
    fs::write(opts.images_dir.join("broken.svg"), "<svg/>").unwrap();
    opts.size = SizePolicy::Detect { fallback: ImageSize::square(10.0) };

    let records = vec![record(0, "kili.svg", "a"), record(1, "broken.svg", "b")];
    document::assemble(&records, &opts, &EmphasisStyle::default(), None).unwrap();
    let content = zip_entry(&opts.out_path, "content.xml");
    assert!(content.contains(r#"svg:width="48px" svg:height="24px""#));
    assert!(content.contains(r#"svg:width="10px" svg:height="10px""#));
}

#[test]
fn editable_copies_use_index_and_text() {
    let (tmp, mut opts) = workspace(&["kili.svg", "ilo.svg"]);
    let editable = tmp.path().join("editable_images");
    opts.editable_dir = Some(editable.clone());

    let records = vec![
        record(0, "kili.svg", "kili <em>moku</em>: pona"),
        record(1, "ilo.svg", "ilo / tool?"),
    ];
    let summary = document::assemble(&records, &opts, &EmphasisStyle::default(), None).unwrap();

    let expected: Vec<PathBuf> = vec![editable.join("0 kili moku, pona.svg"), editable.join("1 ilo tool.svg")];
    assert_eq!(summary.editable_copies, expected);
    for p in &expected {
        assert_eq!(fs::read_to_string(p).unwrap(), SVG_48);
    }
}

#[test]
fn records_sheet_round_trips_its_url_column() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("scraped data.ods");
    let records = vec![
        record(0, "kili.svg", "kili <em>moku</em>"),
        record(1, "jan.svg", "jan"),
    ];
    ods::write_sheet(&path, &document::records_sheet(&records), &EmphasisStyle::default()).unwrap();

    let urls = ods::read_first_column(&path).unwrap();
    assert_eq!(urls, vec!["https://example.org/img/kili.svg", "https://example.org/img/jan.svg"]);
}

#[test]
fn reading_a_non_document_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("not.ods");
    fs::write(&path, b"plain text").unwrap();
    assert!(matches!(ods::read_first_column(&path), Err(Error::Zip(_))));
}

#[test]
fn long_descriptions_still_produce_editable_copies() {
    let (tmp, mut opts) = workspace(&["kili.svg"]);
    opts.editable_dir = Some(tmp.path().join("editable_images"));

    let records = vec![record(0, "kili.svg", &"word ".repeat(80))];
    let summary = document::assemble(&records, &opts, &EmphasisStyle::default(), None).unwrap();

    let copy = &summary.editable_copies[0];
    assert!(copy.file_name().unwrap().len() <= 255);
    assert_eq!(copy.extension().unwrap(), "svg");
    assert_eq!(fs::read_to_string(copy).unwrap(), SVG_48);
    assert!(opts.out_path.is_file());
}
