//! Inline image embedding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::source::ImageData;

/// Encode image bytes as a `data:` URI.
pub fn data_uri(image: &ImageData) -> String {
    format!("data:image/{};base64,{}", image.format, STANDARD.encode(&image.bytes))
}

/// Centered `<img>` block for an embedded image.
pub fn image_block(image: &ImageData) -> String {
    format!(
        r#"<div style="text-align: center; margin: 20px 0;"><img src="{}" style="max-width: 90%; height: auto; border-radius: 8px; box-shadow: 0 4px 8px rgba(0,0,0,0.1);"></div>"#,
        data_uri(image)
    )
}
