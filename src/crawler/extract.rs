//! Main-content extraction
//!
//! This module reduces a full HTML page to its `<main>` element, with
//! scripts, styles, images, forms and inline SVG removed together with
//! everything inside them.

use scraper::{ElementRef, Html};
use thiserror::Error;

/// Tag holding a page's primary content
pub const MAIN_CONTENT_TAG: &str = "main";

/// Elements removed (with their whole subtree) from the extracted content
pub const DENYLISTED_TAGS: &[&str] = &["script", "style", "img", "form", "svg"];

/// Errors that can occur during extraction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The page has no `<main>` element; the message doubles as file content
    #[error("The <main> tag could not be found in the HTML content.")]
    NoMainContent,
}

/// Extracts the `<main>` element of a page with denylisted elements removed
///
/// The returned fragment is the serialized `<main>` element itself,
/// attributes included. Whitespace and all other markup are kept as parsed.
///
/// # Arguments
///
/// * `html` - The full page markup
///
/// # Returns
///
/// * `Ok(String)` - The serialized content fragment
/// * `Err(ExtractError::NoMainContent)` - The page has no `<main>` element
///
/// # Example
///
/// ```
/// use sitemap_mirror::crawler::extract_main_content;
///
/// let html = r#"<html><body><nav>Menu</nav><main><p>Hi</p><script>x()</script></main></body></html>"#;
/// assert_eq!(extract_main_content(html).unwrap(), "<main><p>Hi</p></main>");
/// ```
pub fn extract_main_content(html: &str) -> Result<String, ExtractError> {
    let mut document = Html::parse_document(html);

    let main_id = first_element_named(&document, MAIN_CONTENT_TAG)
        .map(|main| main.id())
        .ok_or(ExtractError::NoMainContent)?;

    let doomed: Vec<_> = document
        .tree
        .get(main_id)
        .and_then(ElementRef::wrap)
        .map(|main| {
            main.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|element| is_denylisted(element.value().name()))
                .map(|element| element.id())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
        .tree
        .get(main_id)
        .and_then(ElementRef::wrap)
        .map(|main| main.html())
        .ok_or(ExtractError::NoMainContent)
}

fn first_element_named<'a>(document: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == name)
}

fn is_denylisted(name: &str) -> bool {
    DENYLISTED_TAGS.contains(&name)
}
