//! Samsung Motion Photos: JPEG images with a short MP4 clip
//! appended in a vendor trailer.
//!
//! Extraction writes the clip next to the image as `<base>.mp4`
//! with the image's metadata copied onto it. Splitting additionally
//! cuts the trailer off the JPEG, which is only done when the trailer
//! holds nothing but the video and its bookkeeping entries.

use std::{
    fs::{self, OpenOptions},
    io::Cursor,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    consts::{MOTION_PHOTO_TYPE, SAMSUNG_TRAILER_ENTRIES},
    support::{base_path, with_suffix},
    AtomHeader,
    ContainerIo,
    DriftError,
};

/// What extraction produced.
#[derive(Debug)]
pub struct MotionPhotoOutcome {
    /// Path of the extracted video.
    pub video: PathBuf,
    /// Whether the image's metadata was copied to the video.
    pub tags_copied: bool,
    /// Byte length the JPEG was truncated to, if split.
    pub truncated_to: Option<u64>,
}

/// Whether `bytes` start with an MP4 `ftyp` atom.
pub fn is_mp4(bytes: &[u8]) -> bool {
    let mut cursor = Cursor::new(bytes);
    match AtomHeader::read(&mut cursor, bytes.len() as u64) {
        Ok(header) => header.is(b"ftyp"),
        Err(_) => false,
    }
}

/// Finds the byte offset of the Samsung trailer in exiftool's `-v1` listing.
///
/// The trailer section starts with a line like
/// `Samsung trailer (2413302 bytes at offset 0x2a9f3c):`
/// and continues with lines indented by two spaces.
/// Any entry in that section other than the video and its
/// bookkeeping fails with `UnknownTrailerContent`.
pub fn samsung_trailer_offset(listing: &str) -> Result<u64, DriftError> {
    let mut offset = None;
    let mut in_trailer = false;

    for line in listing.lines() {
        if !in_trailer && line.starts_with("Samsung trailer") {
            in_trailer = true;
            offset = Some(parse_trailer_offset(line).ok_or(DriftError::MissingTrailerOffset)?);
        } else if in_trailer {
            match line.strip_prefix("  ") {
                Some(entry) => {
                    if !SAMSUNG_TRAILER_ENTRIES.iter().any(|e| entry.starts_with(e)) {
                        return Err(DriftError::UnknownTrailerContent(entry.trim().to_owned()))
                    }
                },
                None => in_trailer = false,
            }
        }
    }

    offset.ok_or(DriftError::MissingTrailerOffset)
}

/// `Samsung trailer (N bytes at offset 0x...)` -> offset.
fn parse_trailer_offset(line: &str) -> Option<u64> {
    let (_, rest) = line.split_once("bytes at offset 0x")?;
    let hex: String = rest.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    u64::from_str_radix(&hex, 16).ok()
}

/// Extracts the embedded video of the motion photo at `image`,
/// optionally cutting it off the image (`split`).
pub fn extract_motion_photo(
    image: &Path,
    tool: &dyn ContainerIo,
    split: bool
) -> Result<MotionPhotoOutcome, DriftError> {
    if !image.is_file() {
        return Err(DriftError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Photo file {} does not exist", image.display())
        )))
    }

    match tool.embedded_video_type(image)? {
        Some(kind) if kind == MOTION_PHOTO_TYPE => (),
        other => {
            debug!(?other, "embedded video type");
            return Err(DriftError::NotMotionPhoto(image.to_owned()))
        },
    }

    let bytes = tool.embedded_video(image)?;
    if !is_mp4(&bytes) {
        return Err(DriftError::NoSuchAtom("ftyp in embedded video".to_owned()))
    }

    let video = with_suffix(&base_path(image), ".mp4");
    fs::write(&video, &bytes)?;
    info!(video = %video.display(), bytes = bytes.len(), "embedded video saved");

    let tags_copied = match tool.copy_tags(image, &video) {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "could not copy metadata to video");
            false
        },
    };

    let truncated_to = match split {
        true => {
            // Locate the cut before touching the image.
            let offset = samsung_trailer_offset(&tool.trailer_listing(image)?)?;
            let file = OpenOptions::new().write(true).open(image)?;
            let len = file.metadata()?.len();
            match offset < len {
                true => {
                    file.set_len(offset)?;
                    info!(image = %image.display(), offset, "embedded video removed from image");
                    Some(offset)
                },
                false => {
                    warn!(image = %image.display(), offset, len, "trailer offset at or past end of image, left as is");
                    None
                },
            }
        },
        false => None,
    };

    Ok(MotionPhotoOutcome { video, tags_copied, truncated_to })
}
