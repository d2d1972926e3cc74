//! Embedded album identifier
//!
//! Each artifact carries the album identifier in the EXIF `ImageDescription`
//! field of its primary IFD. Reading it back is how a run rebuilds the set of
//! albums already on disk.

use std::io::{BufReader, Cursor};
use std::path::Path;

use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};

use crate::error::TagError;

/// EXIF field that stores the album identifier
pub const IDENTIFIER_TAG: Tag = Tag::ImageDescription;

/// Read the identifier embedded in an artifact on disk
///
/// Returns `None` when the file cannot be opened, is not a container with EXIF
/// metadata, or lacks a non-empty identifier field. Foreign and corrupt files
/// are expected in the output directory and never an error.
pub fn read_identifier(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let exif = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;
    identifier_from_exif(&exif)
}

/// Read the identifier embedded in an in-memory image
pub fn read_identifier_from_bytes(bytes: &[u8]) -> Option<String> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    identifier_from_exif(&exif)
}

fn identifier_from_exif(exif: &Exif) -> Option<String> {
    let field = exif.get_field(IDENTIFIER_TAG, In::PRIMARY)?;
    let Value::Ascii(ref parts) = field.value else {
        return None;
    };
    parts
        .iter()
        .map(|part| String::from_utf8_lossy(part).trim_end_matches('\0').to_string())
        .find(|s| !s.is_empty())
}

/// Embed `identifier` into freshly downloaded image bytes
///
/// Any EXIF segment already present is replaced; every other segment, including
/// the compressed image data, is copied unchanged. Only JPEG input is accepted,
/// matching the `.jpg` artifacts; any other container is
/// [`TagError::UnsupportedFormat`].
pub fn write_tagged(raw: &[u8], identifier: &str) -> Result<Vec<u8>, TagError> {
    if identifier.is_empty() || identifier.contains('\0') {
        return Err(TagError::InvalidIdentifier(identifier.to_string()));
    }

    let mut image = Jpeg::from_bytes(Bytes::copy_from_slice(raw))
        .map_err(|e| TagError::UnsupportedFormat(format!("not a JPEG image: {e}")))?;

    let exif = encode_identifier(identifier)?;
    image.set_exif(Some(Bytes::from(exif)));

    Ok(image.encoder().bytes().to_vec())
}

/// Encode a TIFF-structured EXIF payload holding only the identifier field
fn encode_identifier(identifier: &str) -> Result<Vec<u8>, TagError> {
    let field = Field {
        tag: IDENTIFIER_TAG,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![identifier.as_bytes().to_vec()]),
    };

    let mut writer = Writer::new();
    writer.push_field(&field);

    let mut buf = Cursor::new(Vec::new());
    writer
        .write(&mut buf, false)
        .map_err(|e| TagError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}
