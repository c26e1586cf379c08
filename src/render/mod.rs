//! Rendering module: Markdown output plus a JSON dump of the extracted model.

mod heading;
mod json;
mod markdown;
mod normalize;
mod options;
mod result;

pub use heading::{HeadingRules, DEFAULT_KEYWORDS, DEFAULT_MAX_CAPS_LEN};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownFormatter};
pub use normalize::{escape_html, normalize_text, TextNormalizer};
pub use options::{Labels, PageSelection, RenderOptions};
pub use result::{ExtractionStats, RenderResult};
