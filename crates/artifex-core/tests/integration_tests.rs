//! Integration tests for artifex-core.
//!
//! These tests run the pipeline end to end against real directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use artifex_core::ArchiveLimits;
use artifex_core::ArtifactSource;
use artifex_core::Dirs;
use artifex_core::Extraction;
use artifex_core::ExtractionReport;
use artifex_core::Extractor;
use artifex_core::InspectConfig;
use artifex_core::InspectError;
use artifex_core::ListingOutcome;
use artifex_core::Platform;
use artifex_core::ReadmeOutcome;
use artifex_core::SkipReason;
use artifex_core::TextEncoding;
use artifex_core::formats::Unpacker;
use artifex_core::formats::UnpackerRegistry;
use artifex_core::formats::ZipUnpacker;
use artifex_core::inspection::list_dir;
use artifex_core::list_content;
use artifex_core::readme::render_text;
use artifex_core::render_readme;
use artifex_core::signature::Signature;
use artifex_core::test_utils::create_deflated_zip;
use artifex_core::test_utils::create_test_zip;
use tempfile::TempDir;

/// Wraps the ZIP unpacker and counts how often it runs.
struct CountingUnpacker {
    runs: Arc<AtomicUsize>,
}

impl Unpacker for CountingUnpacker {
    fn name(&self) -> &str {
        "counting-zip"
    }

    fn handles(&self, signature: Signature) -> bool {
        signature == Signature::Zip
    }

    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> artifex_core::Result<ExtractionReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ZipUnpacker.unpack(source, dest, limits)
    }
}

fn workspace() -> (TempDir, Dirs, InspectConfig) {
    let temp = TempDir::new().unwrap();
    let dirs = Dirs::under(temp.path());
    for dir in [&dirs.download, &dirs.preview, &dirs.extra] {
        fs::create_dir_all(dir).unwrap();
    }
    let config = InspectConfig::default().with_scratch_root(temp.path().join("scratch"));
    (temp, dirs, config)
}

#[test]
fn test_extraction_runs_once_per_artifact() {
    let (_temp, dirs, config) = workspace();
    let source = dirs.download.join("a1b2");
    fs::write(
        &source,
        create_test_zip(&[("README.TXT", b"hello"), ("SUB/", b""), ("SUB/X.DAT", b"x")]),
    )
    .unwrap();

    let runs = Arc::new(AtomicUsize::new(0));
    let mut registry = UnpackerRegistry::with_defaults();
    registry.register(Box::new(CountingUnpacker { runs: Arc::clone(&runs) }));
    let extractor = Extractor::with_registry(config, registry);

    let first = extractor.extract(&source).unwrap();
    let second = extractor.extract(&source).unwrap();
    let third = extractor.extract_named(&source, Some("OTHER.ZIP")).unwrap();

    assert!(matches!(first, Extraction::Extracted { .. }));
    assert!(matches!(second, Extraction::Cached { .. }));
    assert!(matches!(third, Extraction::Cached { .. }));
    assert_eq!(first.dir(), second.dir());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_extraction_runs_once() {
    let (_temp, dirs, config) = workspace();
    let source = dirs.download.join("shared");
    let files: Vec<(String, Vec<u8>)> =
        (0..50).map(|i| (format!("F{i:03}.TXT"), vec![b'a'; 100])).collect();
    let entries: Vec<(&str, &[u8])> =
        files.iter().map(|(n, d)| (n.as_str(), d.as_slice())).collect();
    fs::write(&source, create_test_zip(&entries)).unwrap();

    let runs = Arc::new(AtomicUsize::new(0));
    let mut registry = UnpackerRegistry::with_defaults();
    registry.register(Box::new(CountingUnpacker { runs: Arc::clone(&runs) }));
    let extractor = Extractor::with_registry(config, registry);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let extraction = extractor.extract(&source).unwrap();
                let listing =
                    list_dir(extraction.dir().unwrap(), Platform::Dos, extractor.config()).unwrap();
                assert_eq!(listing.entries.len(), 50);
            });
        }
    });
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_size_ceiling_creates_nothing() {
    let (temp, dirs, config) = workspace();
    let source = dirs.download.join("huge");
    File::create(&source).unwrap().set_len(151_000_000).unwrap();
    let extractor = Extractor::new(config);

    let extraction = extractor.extract(&source).unwrap();
    assert!(matches!(
        extraction,
        Extraction::TooLarge {
            size: 151_000_000,
            limit: 150_000_000
        }
    ));
    assert!(!temp.path().join("scratch").exists());

    let outcome = list_content(&ArtifactSource::new("huge", "HUGE.ZIP"), &dirs, &extractor);
    assert_eq!(outcome, ListingOutcome::TooLarge);
    assert_eq!(outcome.note(), Some("too large to decompress"));
}

#[test]
fn test_latin1_fallback() {
    let outcome =
        render_text(b"R\xe9sum\xe9 of the na\xefve gr\xfc\xdfe", Platform::Windows).unwrap();
    let ReadmeOutcome::Rendered(readme) = outcome else {
        panic!("expected a readme");
    };
    assert_eq!(readme.encoding, TextEncoding::Latin1);
    assert_eq!(readme.latin1, "Résumé of the naïve grüße");
    assert_ne!(readme.latin1, readme.cp437);
}

#[test]
fn test_utf16_rejected() {
    let utf16: Vec<u8> = "\u{feff}Hello from a Windows editor"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let source = ArtifactSource::new("w1", "README.TXT").with_bytes(utf16);
    assert_eq!(
        render_readme(&source, &Dirs::default()).unwrap(),
        ReadmeOutcome::Skipped(SkipReason::WideText)
    );
}

#[test]
fn test_listing_truncated_after_cap() {
    let (temp, _dirs, config) = workspace();
    let tree = temp.path().join("tree");
    fs::create_dir(&tree).unwrap();
    for i in 0..500 {
        fs::write(tree.join(format!("FILE{i:04}.TXT")), b"some text").unwrap();
    }

    let listing = list_dir(&tree, Platform::Dos, &config).unwrap();
    assert_eq!(listing.entries.len(), 200);
    assert_eq!(listing.more_files, 300);
    let lines = listing.render();
    assert_eq!(lines.len(), 201);
    assert_eq!(lines.last().unwrap(), "… 300 more files");
    assert!(lines[0].starts_with("FILE0000.TXT  9 B"));
}

#[test]
fn test_zero_byte_files_summarized() {
    let (temp, _dirs, config) = workspace();
    let tree = temp.path().join("tree");
    fs::create_dir(&tree).unwrap();
    for name in ["EMPTY1", "EMPTY2", "EMPTY3"] {
        File::create(tree.join(name)).unwrap();
    }
    fs::write(tree.join("REAL.TXT"), b"content").unwrap();

    let listing = list_dir(&tree, Platform::Dos, &config).unwrap();
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(
        listing.render(),
        vec!["REAL.TXT  7 B  plain text [text]", "skipped 3 empty (0 B) files"]
    );
}

#[test]
fn test_dos_programs_not_flagged() {
    let (_temp, dirs, config) = workspace();
    fs::write(
        dirs.download.join("g1"),
        create_test_zip(&[("GAME.EXE", b"MZ\x00\x01\x02\x03"), ("SETUP.COM", b"MZ\x10\x11")]),
    )
    .unwrap();
    let extractor = Extractor::new(config);

    for (platform, flagged) in [(Platform::Dos, false), (Platform::Windows, true)] {
        let source = ArtifactSource::new("g1", "GAME.ZIP").with_platform(platform);
        let ListingOutcome::Listed(listing) = list_content(&source, &dirs, &extractor) else {
            panic!("expected a listing");
        };
        assert!(listing.entries.iter().all(|e| e.is_program == flagged), "{platform}");
    }
}

#[test]
fn test_scenario_ascii_readme_in_zip() {
    let (_temp, dirs, config) = workspace();
    let line = "x".repeat(79);
    let readme: String = (0..125).map(|_| format!("{line}\r\n")).collect();
    assert!(readme.len() > 10_000);
    fs::write(
        dirs.download.join("s1"),
        create_test_zip(&[("README.TXT", readme.as_bytes())]),
    )
    .unwrap();
    let extractor = Extractor::new(config);
    let source = ArtifactSource::new("s1", "SCENE.ZIP").with_platform(Platform::Dos);

    let extraction = extractor.extract(&dirs.download.join("s1")).unwrap();
    let extracted = fs::read(extraction.dir().unwrap().join("README.TXT")).unwrap();
    fs::write(dirs.extra.join("s1.txt"), extracted).unwrap();

    let ReadmeOutcome::Rendered(readme) = render_readme(&source, &dirs).unwrap() else {
        panic!("expected a readme");
    };
    assert_eq!(readme.encoding, TextEncoding::Utf8);
    assert_eq!(readme.latin1, readme.cp437);
    assert_eq!(readme.line_count, 125);
    assert_eq!(readme.max_line_width, 79);

    let ListingOutcome::Listed(listing) = list_content(&source, &dirs, &extractor) else {
        panic!("expected a listing");
    };
    assert_eq!(listing.render(), vec!["README.TXT  10 kB  plain text [text]"]);
}

#[test]
fn test_scenario_ansi_with_sauce() {
    let mut raw = b"\x1b[0;1;33mWELCOME\x1b[0m TO\r\n\x1b[44mTHE BOARD\x1b[0m\r\n\x1a".to_vec();
    raw.extend_from_slice(b"SAUCE00Welcome screen                      Someone\x1b[5m");
    raw.resize(raw.len() + 64, b' ');
    let source = ArtifactSource::new("s2", "WELCOME.ANS")
        .with_platform(Platform::Ansi)
        .with_bytes(raw);

    let ReadmeOutcome::Rendered(readme) = render_readme(&source, &Dirs::default()).unwrap() else {
        panic!("expected a readme");
    };
    assert_eq!(readme.latin1, "WELCOME TO\r\nTHE BOARD");
    assert!(!readme.cp437.contains('\u{1b}'));
    assert!(!readme.cp437.contains("SAUCE"));
    assert_eq!(readme.line_count, 2);
    assert_eq!(readme.max_line_width, 10);
}

#[test]
fn test_compression_ratio_guard() {
    let (_temp, dirs, config) = workspace();
    let config = config.with_limits(ArchiveLimits {
        max_compression_ratio: 10.0,
        ..ArchiveLimits::default()
    });
    let zeros = vec![0u8; 1_000_000];
    let source = dirs.download.join("bomb");
    fs::write(&source, create_deflated_zip(&[("ZEROS.BIN", &zeros)])).unwrap();
    let extractor = Extractor::new(config);

    let err = extractor.extract(&source).unwrap_err();
    assert!(matches!(err, InspectError::ZipBomb { .. }));
    assert!(err.is_security_violation());
    assert!(!extractor.cache_dir(&source).unwrap().exists());
}

#[test]
fn test_traversal_fails_listing() {
    let (_temp, dirs, config) = workspace();
    fs::write(
        dirs.download.join("evil"),
        create_test_zip(&[("../../escape.txt", b"pwned")]),
    )
    .unwrap();
    let extractor = Extractor::new(config);

    let outcome = list_content(&ArtifactSource::new("evil", "EVIL.ZIP"), &dirs, &extractor);
    let ListingOutcome::Failed(reason) = outcome else {
        panic!("expected failure");
    };
    assert!(reason.contains("path traversal"));
    assert!(!dirs.download.join("escape.txt").exists());
}
