//! HTML rendering of translated pages.

mod html;
mod image;
mod page;

pub use html::{escape_html, html_document};
pub use image::{data_uri, image_block};
pub use page::{page_anchor, page_error_fragment, page_footer, PageBuilder};
