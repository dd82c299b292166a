// Integration tests for the upload acquisition path

use tempfile::TempDir;
use voxcheck::audio::{upload, ClipSource};
use voxcheck::error::AcquireError;

fn write_wav(dir: &TempDir, name: &str, seconds: f64) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..(16000.0 * seconds) as usize {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn loading_a_wav_file_probes_its_duration() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(&dir, "voice_001.wav", 3.1);

    let clip = upload::load(&path).unwrap();

    assert_eq!(clip.filename, "voice_001.wav");
    assert_eq!(clip.media_type, "audio/wav");
    assert_eq!(clip.format, ".WAV");
    assert_eq!(clip.source, ClipSource::Upload);
    assert!((clip.duration_secs - 3.1).abs() < 0.01);
    assert!(!clip.is_empty());
}

#[test]
fn non_audio_files_are_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not audio").unwrap();

    let err = upload::load(&path).unwrap_err();
    assert!(matches!(err, AcquireError::InvalidMediaType { .. }));
}

#[test]
fn missing_files_surface_an_io_error() {
    let err = upload::load("/no/such/file.wav").unwrap_err();
    assert!(matches!(err, AcquireError::Io(_)));
}
