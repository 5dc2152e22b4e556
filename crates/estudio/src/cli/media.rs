//! Reading media files as data URIs and writing generated images.

use estudio_core::DataUri;
use estudio_error::{
    EstudioResult, MediaError, MediaErrorKind, StorageError, StorageErrorKind,
};
use std::path::Path;
use std::str::FromStr;

/// MIME type for a file extension.
pub fn mime_for(path: &Path) -> EstudioResult<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        other => {
            return Err(MediaError::new(MediaErrorKind::InvalidMime(format!(
                "unsupported file extension '{}'",
                other
            )))
            .into());
        }
    };
    Ok(mime)
}

/// Read a file as a data URI string.
pub fn read_data_uri(path: &Path) -> EstudioResult<String> {
    let mime = mime_for(path)?;
    let bytes = std::fs::read(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    Ok(DataUri::from_bytes(mime, &bytes).to_string())
}

/// File extension for an image MIME type.
fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// Decode an image data URI into `dir/<stem>.<ext>` and return the path.
pub fn write_image(dir: &Path, stem: &str, data_uri: &str) -> EstudioResult<std::path::PathBuf> {
    let uri = DataUri::from_str(data_uri)?;
    let bytes = uri.decode()?;
    let path = dir.join(format!("{}.{}", stem, extension_for(uri.mime())));
    std::fs::write(&path, bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_and_unknown() {
        assert_eq!(mime_for(Path::new("foto.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for(Path::new("audio.mp3")).unwrap(), "audio/mpeg");
        assert!(mime_for(Path::new("notas.txt")).is_err());
        assert!(mime_for(Path::new("sem_extensao")).is_err());
    }
}
