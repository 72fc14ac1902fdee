#![cfg(unix)]

use diplo::config::EngineSettings;
use diplo::{Interrupt, ProcessRenderer, RenderJob, Renderer};
use diplo_traits::ImageLinks;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A renderer engine that is a shell script: `$1` is the server URL,
/// `$2` the JSON, `$3` the SVG and `$5` the overlay.
fn engine(dir: &TempDir, body: &str) -> EngineSettings {
    let script = dir.path().join("render.sh");
    std::fs::write(&script, body).unwrap();
    EngineSettings {
        binary: "/bin/sh".to_string(),
        script: script.to_string_lossy().into_owned(),
        flags: Vec::new(),
        debug_flag: String::new(),
    }
}

fn job(dir: &Path) -> RenderJob {
    let json = dir.join("pages/A/page_1.json");
    std::fs::create_dir_all(json.parent().unwrap()).unwrap();
    std::fs::write(&json, "{}").unwrap();
    RenderJob {
        label: "A#1".to_string(),
        server_url: "http://localhost:1/transcript-generation.html".to_string(),
        json,
        svg: dir.join("www/transcript/diplomatic/A/page_1.svg"),
        links: None,
    }
}

#[test]
fn test_successful_render_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "printf '<svg/>' > \"$3\"\n");
    let job = job(dir.path());

    let outcome = ProcessRenderer::new(&engine, Interrupt::new()).render(&job);

    assert!(outcome.success, "{}", outcome.output);
    assert_eq!(outcome.output, "");
    assert_eq!(std::fs::read_to_string(&job.svg).unwrap(), "<svg/>");
}

#[test]
fn test_links_are_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "cat \"$4\" > \"$5\"\n");
    let mut job = job(dir.path());
    let source = dir.path().join("links.svg");
    std::fs::write(&source, "<svg id=\"links\"/>").unwrap();
    let overlay = dir.path().join("www/transcript/overlay/A/page_1.svg");
    job.links = Some(ImageLinks {
        source,
        overlay: overlay.clone(),
    });

    let outcome = ProcessRenderer::new(&engine, Interrupt::new()).render(&job);

    assert!(outcome.success, "{}", outcome.output);
    assert_eq!(std::fs::read_to_string(overlay).unwrap(), "<svg id=\"links\"/>");
}

#[test]
fn test_repeated_warnings_are_collapsed() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(
        &dir,
        "echo 'font missing'\necho 'font missing'\necho 'slow page' >&2\nexit 0\n",
    );

    let outcome = ProcessRenderer::new(&engine, Interrupt::new()).render(&job(dir.path()));

    assert!(outcome.success);
    let mut lines: Vec<_> = outcome.output.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["font missing", "slow page"]);
}

#[test]
fn test_output_keeps_write_order_across_streams() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "echo 'loading page' >&2\nsleep 0.3\necho 'page rendered'\n");

    let outcome = ProcessRenderer::new(&engine, Interrupt::new()).render(&job(dir.path()));

    assert!(outcome.success);
    assert_eq!(outcome.output, "loading page\npage rendered");
}

#[test]
fn test_nonzero_exit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "echo 'TypeError: x is undefined' >&2\nexit 2\n");

    let outcome = ProcessRenderer::new(&engine, Interrupt::new()).render(&job(dir.path()));

    assert!(!outcome.success);
    assert!(outcome.output.starts_with("Exit status"), "{}", outcome.output);
    assert!(outcome.output.ends_with("TypeError: x is undefined"));
}

#[test]
fn test_timeout_kills_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "exec sleep 30\n");
    let renderer = ProcessRenderer::new(&engine, Interrupt::new())
        .with_timeout(Some(Duration::from_millis(200)));

    let started = Instant::now();
    let outcome = renderer.render(&job(dir.path()));

    assert!(!outcome.success);
    assert!(outcome.output.starts_with("Killed after"), "{}", outcome.output);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_interrupt_kills_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "exec sleep 30\n");
    let interrupt = Interrupt::new();
    let renderer = ProcessRenderer::new(&engine, interrupt.clone());

    let trigger = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        interrupt.trigger();
    });
    let started = Instant::now();
    let outcome = renderer.render(&job(dir.path()));
    trigger.join().unwrap();

    assert!(!outcome.success);
    assert!(outcome.output.starts_with("Interrupted"));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_timeout_kills_forked_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "echo starting\nsleep 30\necho done\n");
    let renderer = ProcessRenderer::new(&engine, Interrupt::new())
        .with_timeout(Some(Duration::from_millis(200)));

    let started = Instant::now();
    let outcome = renderer.render(&job(dir.path()));

    assert!(!outcome.success);
    assert!(outcome.output.starts_with("Killed after"), "{}", outcome.output);
    assert!(!outcome.output.contains("done"));
    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
}

#[test]
fn test_interrupt_kills_forked_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir, "sleep 30 &\nwait\n");
    let interrupt = Interrupt::new();
    let renderer = ProcessRenderer::new(&engine, interrupt.clone());

    let trigger = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        interrupt.trigger();
    });
    let started = Instant::now();
    let outcome = renderer.render(&job(dir.path()));
    trigger.join().unwrap();

    assert!(!outcome.success);
    assert!(outcome.output.starts_with("Interrupted"));
    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
}
