use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn data_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+);base64,(?P<payload>[A-Za-z0-9+/=]*)$")
            .expect("valid data url regex")
    })
}

/// Encodes raw bytes as a `data:<mime>;base64,...` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Splits a base64 data URL into its MIME type and payload.
pub fn parse_data_url(url: &str) -> Option<(&str, &str)> {
    let caps = data_url_re().captures(url)?;
    Some((caps.name("mime")?.as_str(), caps.name("payload")?.as_str()))
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.to_ascii_lowercase().starts_with("image/")
}

/// Guesses an image MIME type from the file extension.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}
