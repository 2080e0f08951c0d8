// tests/pipeline.rs
use std::fs;
use std::path::Path;

use kama_sona_scrape::config::options::AppOptions;
use kama_sona_scrape::core::net::{Fetch, Response};
use kama_sona_scrape::document::ods;
use kama_sona_scrape::progress::Progress;
use kama_sona_scrape::runner;
use kama_sona_scrape::{Error, Result};
use tempfile::TempDir;

const PAGE_URL: &str = "https://example.org/kama-sona/";

/// The word page plus its images; `lipu.svg` is gone from the server.
struct TestSite;

impl Fetch for TestSite {
    fn get(&self, url: &str) -> Result<Response> {
        let ok = |body: &str| -> Result<Response> { Ok(Response { status: 200, body: body.as_bytes().to_vec() }) };
        match url {
            PAGE_URL => ok(r#"<table>
                <tr><th>sitelen</th><th>nimi</th></tr>
                <tr><td><img src="img/kili.svg"></td><td>kili <em>moku</em> pona</td></tr>
                <tr><td><img src="img/lipu.svg"></td><td>lipu: <em>sona</em></td></tr>
                </table>"#),
            "https://example.org/kama-sona/img/kili.svg" => ok(r#"<svg width="8" height="8"/>"#),
            _ => Ok(Response { status: 404, body: Vec::new() }),
        }
    }
}

fn options(tmp: &TempDir) -> AppOptions {
    let mut opts = AppOptions::default();
    opts.scrape.base_url = PAGE_URL.into();
    opts.scrape.records_path = tmp.path().join("scraped data.ods");
    opts.download.images_dir = tmp.path().join("images");
    opts.assemble.images_dir = tmp.path().join("images");
    opts.assemble.out_path = tmp.path().join("kama sona.ods");
    opts.assemble.editable_dir = Some(tmp.path().join("editable_images"));
    opts
}

#[test]
fn scrape_then_download() {
    let tmp = TempDir::new().unwrap();
    let opts = options(&tmp);

    let scraped = runner::scrape_records(&opts, &TestSite, None).unwrap();
    assert_eq!(scraped.files_written, vec![opts.scrape.records_path.clone()]);
    assert_eq!(
        ods::read_first_column(&opts.scrape.records_path).unwrap(),
        vec!["https://example.org/kama-sona/img/kili.svg", "https://example.org/kama-sona/img/lipu.svg"]
    );

    let downloaded = runner::download_from_records(&opts, &TestSite, None).unwrap();
    assert_eq!(downloaded.files_written, vec![opts.download.images_dir.join("kili.svg")]);
    assert_eq!(downloaded.failed.len(), 1);
    assert!(downloaded.failed[0].url.ends_with("lipu.svg"));
}

#[test]
fn assemble_stops_on_the_missing_image() {
    let tmp = TempDir::new().unwrap();
    let opts = options(&tmp);

    let err = runner::run_all(&opts, &TestSite, None).unwrap_err();
    assert!(matches!(err, Error::MissingImage(ref p) if p.ends_with("lipu.svg")), "{err}");
    assert!(!opts.assemble.out_path.exists());
}

#[test]
fn run_all_writes_every_output() {
    let tmp = TempDir::new().unwrap();
    let opts = options(&tmp);
    // Provide the image the server no longer has.
    fs::create_dir_all(&opts.download.images_dir).unwrap();
    fs::write(opts.download.images_dir.join("lipu.svg"), r#"<svg width="8" height="8"/>"#).unwrap();

    let summary = runner::run_all(&opts, &TestSite, None).unwrap();

    assert!(summary.files_written.contains(&opts.scrape.records_path));
    assert!(summary.files_written.contains(&opts.assemble.out_path));
    assert_eq!(summary.failed.len(), 1);

    let editable = opts.assemble.editable_dir.clone().unwrap();
    assert!(editable.join("0 kili moku pona.svg").is_file());
    assert!(editable.join("1 lipu, sona.svg").is_file());
}

/// Counts what each stage reports.
#[derive(Default)]
struct Recorder {
    begun: Vec<usize>,
    done: Vec<String>,
    failed: Vec<String>,
    messages: usize,
    finished: usize,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.begun.push(total);
    }
    fn log(&mut self, _msg: &str) {
        self.messages += 1;
    }
    fn item_done(&mut self, _index: usize, source: &str, _path: &Path) {
        self.done.push(source.into());
    }
    fn item_failed(&mut self, _index: usize, source: &str, _reason: &str) {
        self.failed.push(source.into());
    }
    fn finish(&mut self) {
        self.finished += 1;
    }
}

#[test]
fn run_all_reports_every_stage_to_one_progress() {
    let tmp = TempDir::new().unwrap();
    let opts = options(&tmp);
    fs::create_dir_all(&opts.download.images_dir).unwrap();
    fs::write(opts.download.images_dir.join("lipu.svg"), r#"<svg width="8" height="8"/>"#).unwrap();

    let mut rec = Recorder::default();
    runner::run_all(&opts, &TestSite, Some(&mut rec)).unwrap();

    assert_eq!(rec.begun, vec![2]);
    assert_eq!(rec.done, vec!["https://example.org/kama-sona/img/kili.svg"]);
    assert_eq!(rec.failed, vec!["https://example.org/kama-sona/img/lipu.svg"]);
    assert_eq!(rec.finished, 1);
    // scrape and assemble both log their fetch, the written files and the copies
    assert!(rec.messages >= 6, "{} messages", rec.messages);
}
