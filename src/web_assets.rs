//! Embeds the player shell page and serves it over the custom protocol.

use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use wry::http::{header::CONTENT_TYPE, Request, Response, StatusCode};

/// The built UI files are embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui"]
#[include = "**/*"]
pub struct UiAssets;

/// Provides (Bytes, Content-Type) for a requested resource.
/// - Normal case: the requested file
/// - SPA fallback: `index.html`, if the path is missing
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = normalize(path);
    if let Some(file) = UiAssets::get(&norm) {
        let ct = content_type(&norm);
        Some((file.data, ct))
    } else if norm != "index.html" {
        UiAssets::get("index.html").map(|f| (f.data, String::from("text/html; charset=utf-8")))
    } else {
        None
    }
}

/// Builds the HTTP response for the `ghost` custom protocol.
pub fn response(request: Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    match load(request.uri().path()) {
        Some((data, content_type)) => Response::builder()
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .expect("static asset response"),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Cow::Borrowed(&[] as &[u8]))
            .expect("empty 404 response"),
    }
}

fn normalize(raw: &str) -> String {
    let p = raw.trim_start_matches('/').trim();
    if p.is_empty() {
        "index.html".into()
    } else {
        p.to_string()
    }
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    match guess.type_() {
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JAVASCRIPT => {
            "application/javascript; charset=utf-8".into()
        }
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JSON => {
            "application/json; charset=utf-8".into()
        }
        mime::TEXT if guess.subtype() == mime::PLAIN => "text/plain; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == mime::HTML => "text/html; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == "css" => "text/css; charset=utf-8".into(),
        _ => guess.essence_str().to_string(),
    }
}
