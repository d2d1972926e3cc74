//! Album page and artwork fixtures served from a wiremock server

use std::io::Cursor;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A small valid JPEG without EXIF metadata
pub fn sample_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([x as u8 * 16, y as u8 * 16, 64]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("encode JPEG fixture");
    buf.into_inner()
}

/// Album page with Open Graph artwork and title tags
pub fn album_page(image_url: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:type" content="music.album">
  <meta property="og:title" content="{title}">
  <meta property="og:image" content="{image_url}">
  <title>{title} - Music</title>
</head>
<body><main><h1>{title}</h1></main></body>
</html>"#
    )
}

/// Page path for an album identifier
pub fn page_path(identifier: &str) -> String {
    format!("/playlist/{identifier}")
}

/// Artwork path for an album identifier
pub fn art_path(identifier: &str) -> String {
    format!("/art/{identifier}.jpg")
}

/// Full page link on `server` for an album identifier
pub fn link_for(server: &MockServer, identifier: &str) -> String {
    format!("{}{}", server.uri(), page_path(identifier))
}

/// Serve a complete album: page plus artwork
///
/// Each route expects to be hit `expected_hits` times; pass `0` to assert that
/// nothing is requested.
pub async fn mount_album(server: &MockServer, identifier: &str, title: &str, expected_hits: u64) {
    let image_url = format!("{}{}", server.uri(), art_path(identifier));

    Mock::given(method("GET"))
        .and(path(page_path(identifier)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(album_page(&image_url, title)),
        )
        .expect(expected_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(art_path(identifier)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(sample_jpeg()),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// Answer an album page with a fixed status
pub async fn mount_page_status(server: &MockServer, identifier: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path(identifier)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
