//! Shared fixtures for unit tests.

use std::io::Cursor;

/// A small valid baseline JPEG without any EXIF segment
pub(crate) fn sample_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 8, |x, y| {
        image::Rgb([(x * 32) as u8, (y * 32) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// An album page carrying the Open Graph artwork and title tags
pub(crate) fn album_page(image_url: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head>
<meta charset="utf-8">
<meta property="og:title" content="{title}">
<meta property="og:image" content="{image_url}">
</head><body><h1>{title}</h1></body></html>"#
    )
}
