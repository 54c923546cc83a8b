/// Guess the MIME type of an uploaded image whose part carried no usable
/// content type. Anything unrecognized is sent to the model as PNG.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Upload of {} bytes has no recognizable image signature; sending it as image/png",
                bytes.len()
            );
            "image/png"
        }
    }
}
