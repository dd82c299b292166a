use super::clip::{format_label, AudioClip, ClipSource};
use crate::error::AcquireError;
use hound::WavReader;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Extensions accepted when a file arrives as application/octet-stream
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "webm", "aac"];

/// Declared media type guessed from a filename extension
pub fn media_type_for(filename: &str) -> String {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/x-m4a",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "aac" => "audio/aac",
        "mp4" => "audio/mp4",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Reject any file whose declared media type is not audio
///
/// application/octet-stream is tolerated when the filename carries a known
/// audio extension, matching the analysis service's own acceptance rule.
pub fn validate_media_type(filename: &str, media_type: &str) -> Result<(), AcquireError> {
    if media_type.starts_with("audio/") {
        return Ok(());
    }

    if media_type == "application/octet-stream" {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase())
            .unwrap_or_default();
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            return Ok(());
        }
    }

    Err(AcquireError::InvalidMediaType {
        filename: filename.to_string(),
        media_type: media_type.to_string(),
    })
}

/// Load an uploaded audio file into a clip
///
/// Validation happens before any bytes are read, so a rejected file leaves
/// no state behind. Duration is probed for WAV input; other containers are
/// passed through opaquely and the analysis response supplies the duration.
pub fn load(path: impl AsRef<Path>) -> Result<AudioClip, AcquireError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let media_type = media_type_for(&filename);
    validate_media_type(&filename, &media_type)?;

    let bytes = std::fs::read(path).map_err(|e| AcquireError::Io(e.to_string()))?;

    let duration_secs = probe_wav_duration(&bytes).unwrap_or(0.0);

    info!(
        "Loaded upload {} ({} bytes, {})",
        filename,
        bytes.len(),
        media_type
    );

    Ok(AudioClip {
        format: format_label(&filename),
        filename,
        media_type,
        duration_secs,
        source: ClipSource::Upload,
        bytes,
    })
}

/// Duration in seconds for WAV bytes, if they parse as WAV
fn probe_wav_duration(bytes: &[u8]) -> Option<f64> {
    let reader = WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    let frames = reader.duration();
    Some(frames as f64 / spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_media_types_accepted() {
        assert!(validate_media_type("voice.wav", "audio/wav").is_ok());
        assert!(validate_media_type("voice.mp3", "audio/mpeg").is_ok());
        assert!(validate_media_type("voice.bin", "audio/x-custom").is_ok());
    }

    #[test]
    fn octet_stream_needs_audio_extension() {
        assert!(validate_media_type("voice.wav", "application/octet-stream").is_ok());
        assert!(validate_media_type("voice.txt", "application/octet-stream").is_err());
    }

    #[test]
    fn non_audio_rejected() {
        let err = validate_media_type("notes.txt", "text/plain").unwrap_err();
        match err {
            AcquireError::InvalidMediaType {
                filename,
                media_type,
            } => {
                assert_eq!(filename, "notes.txt");
                assert_eq!(media_type, "text/plain");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn media_type_guessing() {
        assert_eq!(media_type_for("a.wav"), "audio/wav");
        assert_eq!(media_type_for("a.MP3"), "audio/mpeg");
        assert_eq!(media_type_for("a"), "application/octet-stream");
    }
}
