//! Integration tests for Disguise
//!
//! Containers are real files in temporary directories. Video tests are
//! skipped when ffmpeg is not on PATH.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use disguise::config::FileConfig;
use disguise::{
    append_frame, append_frame_from_reader, make_image, Config, CoverKind, DisguiseError,
    Embedder, Extractor, Location, Rgb,
};
use tempfile::tempdir;

/// Reader that hands out some bytes and then fails.
struct FailingReader {
    remaining: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }
        let n = buf.len().min(self.remaining);
        buf[..n].fill(b'z');
        self.remaining -= n;
        Ok(n)
    }
}

fn small_image() -> Config {
    Config::default().with_cover(CoverKind::Image {
        width: 8,
        height: 8,
    })
}

/// Test the documented example: 41-byte secret.txt in a 320x240 bitmap
#[test]
fn test_concrete_secret_txt() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("secret.txt");
    let payload = b"The eagle lands at midnight. Bring cake.\n";
    assert_eq!(payload.len(), 41);
    fs::write(&input, payload).unwrap();

    let config = Config::default();
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();

    assert_eq!(container, dir.path().join("secret.txt.bmp"));
    let size = fs::metadata(&container).unwrap().len();
    assert_eq!(size, 54 + 230_400 + 15 + 4 + 10 + 41);

    let data = fs::read(&container).unwrap();
    assert_eq!(&data[..2], b"BM");
    assert_eq!(&data[230_454..230_469], b"FILE_DATA_BEGIN");
    assert_eq!(&data[230_469..230_473], &10u32.to_le_bytes());
    assert_eq!(&data[230_473..230_483], b"secret.txt");

    let out = dir.path().join("out");
    let restored = Extractor::new(&config)
        .extract_file(&container, Some(&out))
        .unwrap();

    assert_eq!(restored, out.join("secret.txt.restored"));
    assert_eq!(fs::read(&restored).unwrap(), payload);
}

/// Test that the container still opens as a picture
#[test]
fn test_container_is_still_an_image() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, b"# notes\n").unwrap();

    let config = Config::default().with_cover(CoverKind::Image {
        width: 32,
        height: 16,
    });
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();

    let decoded = image::open(&container).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (32, 16));
    let first = *decoded.get_pixel(0, 0);
    assert!(decoded.pixels().all(|p| *p == first));
}

/// Test binary payload round trip with a tiny chunk size
#[test]
fn test_binary_roundtrip_small_chunks() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("blob.bin");
    let mut payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    // The payload itself contains the marker; it must survive untouched
    payload.splice(500..500, b"FILE_DATA_BEGIN".iter().copied());
    fs::write(&input, &payload).unwrap();

    let config = small_image().with_chunk_size(16);
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();
    let restored = Extractor::new(&config)
        .extract_file(&container, Some(dir.path()))
        .unwrap();

    assert_eq!(restored, dir.path().join("blob.bin.restored"));
    assert_eq!(fs::read(&restored).unwrap(), payload);
}

/// Test empty payload
#[test]
fn test_empty_payload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::write(&input, b"").unwrap();

    let config = small_image();
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();
    let restored = Extractor::new(&config)
        .extract_file(&container, Some(dir.path()))
        .unwrap();

    assert!(fs::read(&restored).unwrap().is_empty());
}

/// Test marker straddling a chunk boundary by every possible amount
#[test]
fn test_marker_split_across_chunks() {
    let chunk = 64;
    let config = Config::default().with_chunk_size(chunk);

    for k in 1..15 {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.bin");
        fs::write(&cover, vec![0xAAu8; chunk - k]).unwrap();
        let payload = dir.path().join("p.txt");
        fs::write(&payload, b"split").unwrap();

        append_frame(&cover, &payload, &config).unwrap();

        let location = Extractor::new(&config).locate(&cover).unwrap();
        assert_eq!(
            location,
            Location::Found {
                offset: (chunk - k) as u64,
                filename: "p.txt".to_string(),
            },
            "k = {}",
            k
        );

        let restored = Extractor::new(&config)
            .extract_file(&cover, Some(dir.path()))
            .unwrap();
        assert_eq!(fs::read(restored).unwrap(), b"split");
    }
}

/// Test that marker bytes in the cover followed by garbage are skipped
#[test]
fn test_false_marker_in_cover() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.bin");
    let mut bytes = vec![1u8; 100];
    bytes.extend_from_slice(b"FILE_DATA_BEGIN");
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x7F]);
    bytes.extend_from_slice(&[2u8; 200]);
    fs::write(&cover, &bytes).unwrap();

    let payload = dir.path().join("real.txt");
    fs::write(&payload, b"the real one").unwrap();

    let config = Config::default().with_chunk_size(32);
    append_frame(&cover, &payload, &config).unwrap();

    let location = Extractor::new(&config).locate(&cover).unwrap();
    assert_eq!(location.offset(), Some(bytes.len() as u64));
    assert_eq!(location.filename(), Some("real.txt"));

    let restored = Extractor::new(&config)
        .extract_file(&cover, Some(dir.path()))
        .unwrap();
    assert_eq!(fs::read(restored).unwrap(), b"the real one");
}

/// Test that a false marker alone means no hidden data
#[test]
fn test_false_marker_only() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.bmp");
    let mut bytes = b"BM".to_vec();
    bytes.extend_from_slice(b"FILE_DATA_BEGIN");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    fs::write(&cover, &bytes).unwrap();

    let config = Config::default();
    let out = dir.path().join("out");
    let result = Extractor::new(&config).extract_file(&cover, Some(&out));

    assert!(matches!(result, Err(DisguiseError::MarkerNotFound(_))));
    assert!(!out.exists());
}

/// Test extracting from a plain cover
#[test]
fn test_no_hidden_data() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("plain.bmp");
    make_image(&cover, 16, 16, Rgb::new(1, 2, 3)).unwrap();

    let config = Config::default();
    let err = Extractor::new(&config)
        .extract_file(&cover, Some(dir.path()))
        .unwrap_err();

    assert!(matches!(err, DisguiseError::MarkerNotFound(_)));
    assert!(err.to_string().starts_with("No hidden data found in"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// Test custom separator on both sides
#[test]
fn test_custom_separator() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("key.pem");
    fs::write(&input, b"-----BEGIN-----").unwrap();

    let custom = small_image().with_marker("@@SPLIT@@").validate().unwrap();
    let container = Embedder::new(&custom).hide_file(&input, None).unwrap();

    let default = small_image();
    assert!(matches!(
        Extractor::new(&default).extract_file(&container, Some(dir.path())),
        Err(DisguiseError::MarkerNotFound(_))
    ));

    let restored = Extractor::new(&custom)
        .extract_file(&container, Some(dir.path()))
        .unwrap();
    assert_eq!(fs::read(restored).unwrap(), b"-----BEGIN-----");
}

/// Test batch hide with one explicit output and batch extract
#[test]
fn test_batch_roundtrip() {
    let dir = tempdir().unwrap();
    let inputs: Vec<_> = ["a.txt", "b.txt", "c.txt"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, format!("content of {}", name)).unwrap();
            path
        })
        .collect();

    let config = small_image();
    let output = dir.path().join("result.bmp");
    let report = Embedder::new(&config).hide_batch(&inputs, Some(&output));

    assert_eq!(report.to_string(), "3/3 processed");
    assert!(report.is_success());

    let containers: Vec<_> = report
        .outputs()
        .into_iter()
        .map(|(_, out)| out.to_path_buf())
        .collect();
    assert_eq!(
        containers,
        vec![
            dir.path().join("result_a.txt.bmp"),
            dir.path().join("result_b.txt.bmp"),
            dir.path().join("result_c.txt.bmp"),
        ]
    );

    let out = dir.path().join("restored");
    let report = Extractor::new(&config).extract_batch(&containers, Some(&out));
    assert_eq!(report.to_string(), "3/3 processed");

    for name in ["a.txt", "b.txt", "c.txt"] {
        let restored = fs::read_to_string(out.join(format!("{}.restored", name))).unwrap();
        assert_eq!(restored, format!("content of {}", name));
    }
}

/// Test that one missing input does not stop the batch
#[test]
fn test_batch_partial_failure() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, b"ok").unwrap();
    let missing = dir.path().join("missing.txt");

    let config = small_image();
    let report = Embedder::new(&config).hide_batch(&[missing.clone(), good], None);

    assert_eq!(report.to_string(), "1/2 processed");
    assert!(!report.is_success());
    assert_eq!(report.failures()[0].input, missing);
    assert!(matches!(
        report.failures()[0].error,
        DisguiseError::InputNotFound(_)
    ));
    assert!(dir.path().join("good.txt.bmp").is_file());
}

/// Test that a failing append leaves the container untouched
#[test]
fn test_failed_append_is_atomic() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.bmp");
    make_image(&cover, 20, 10, Rgb::new(9, 9, 9)).unwrap();
    let before = fs::read(&cover).unwrap();

    let config = Config::default().with_chunk_size(64);
    let result = append_frame_from_reader(
        &cover,
        "doomed.bin",
        &mut FailingReader { remaining: 1000 },
        &config,
    );

    assert!(matches!(result, Err(DisguiseError::Io(_))));
    assert_eq!(fs::read(&cover).unwrap(), before);

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("cover.bmp")]);
}

/// Test loading settings from a TOML file
#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
chunk_size = 128
marker = "ZZZ"
restored_suffix = ".out"

[image]
width = 8
height = 2
"#,
    )
    .unwrap();

    let file = FileConfig::load(Some(&config_path)).unwrap();
    let config = Config::default().with_file(&file).validate().unwrap();
    assert_eq!(config.chunk_size(), 128);

    let input = dir.path().join("x");
    fs::write(&input, b"xyz").unwrap();
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();

    // 8 px * 3 bytes = 24 per row, no padding
    assert_eq!(
        fs::metadata(&container).unwrap().len(),
        54 + 48 + 3 + 4 + 1 + 3
    );

    let restored = Extractor::new(&config)
        .extract_file(&container, Some(dir.path()))
        .unwrap();
    assert_eq!(restored, dir.path().join("x.out"));
    assert_eq!(fs::read(restored).unwrap(), b"xyz");
}

/// Test a missing explicit config file
#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let result = FileConfig::load(Some(&dir.path().join("nope.toml")));
    assert!(matches!(result, Err(DisguiseError::InputNotFound(_))));
}

/// Test video round trip (skipped without ffmpeg)
#[test]
fn test_video_roundtrip() {
    if which::which("ffmpeg").is_err() {
        eprintln!("ffmpeg not on PATH, skipping");
        return;
    }

    let dir = tempdir().unwrap();
    let input = dir.path().join("clip-secret.txt");
    fs::write(&input, b"hidden in a video").unwrap();

    let config = Config::default().with_cover(CoverKind::Video {
        width: 64,
        height: 48,
        duration_secs: 1,
    });
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();
    assert_eq!(container, dir.path().join("clip-secret.txt.mp4"));

    let restored = Extractor::new(&config)
        .extract_file(&container, Some(dir.path()))
        .unwrap();
    assert_eq!(fs::read(restored).unwrap(), b"hidden in a video");
}

/// Test that a missing payload creates no container
#[test]
fn test_missing_payload_leaves_nothing() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let result = Embedder::new(&config).hide_file(Path::new("/no/such/file.txt"), Some(dir.path()));

    assert!(matches!(result, Err(DisguiseError::InputNotFound(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Test that a backslash is an ordinary name character on Unix
#[cfg(unix)]
#[test]
fn test_backslash_name_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report\\2024.txt");
    fs::write(&input, b"quarterly").unwrap();

    let config = small_image();
    let container = Embedder::new(&config).hide_file(&input, None).unwrap();
    assert_eq!(container, dir.path().join("report\\2024.txt.bmp"));

    let out = dir.path().join("out");
    let restored = Extractor::new(&config)
        .extract_file(&container, Some(&out))
        .unwrap();

    assert_eq!(restored, out.join("report\\2024.txt.restored"));
    assert_eq!(fs::read(&restored).unwrap(), b"quarterly");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

/// Test that a failing hide leaves an existing output file alone
#[cfg(unix)]
#[test]
fn test_failed_hide_keeps_existing_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.txt");
    fs::write(&input, b"abc").unwrap();
    let keep = dir.path().join("keep.mp4");
    fs::write(&keep, b"precious").unwrap();

    let config = Config::default()
        .with_cover(CoverKind::video())
        .with_encoder("false");
    let report = Embedder::new(&config).hide_batch(&[input], Some(&keep));

    assert_eq!(report.to_string(), "0/1 processed");
    assert_eq!(fs::read(&keep).unwrap(), b"precious");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
