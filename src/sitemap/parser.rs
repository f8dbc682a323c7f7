//! Sitemap XML parser
//!
//! Classifies a document as a sitemap index or a leaf sitemap and collects
//! its `<loc>` entries in document order.

use crate::sitemap::SitemapError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// A sitemap index: `<loc>` values of child sitemaps
    Index(Vec<String>),

    /// A leaf sitemap: `<loc>` values of pages
    Leaf(Vec<String>),
}

impl SitemapNode {
    /// The raw `<loc>` values held by this node
    pub fn locs(&self) -> &[String] {
        match self {
            Self::Index(locs) | Self::Leaf(locs) => locs,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

/// Which wrapper element a `<loc>` belongs to
#[derive(Debug, Clone, Copy)]
enum LocOwner {
    Sitemap,
    Url,
}

impl LocOwner {
    fn from_parent(parent: Option<&Vec<u8>>) -> Option<Self> {
        match parent.map(Vec::as_slice) {
            Some(b"sitemap") => Some(Self::Sitemap),
            Some(b"url") => Some(Self::Url),
            _ => None,
        }
    }
}

/// Parses a sitemap document
///
/// # Classification
///
/// Any `<sitemap>` element makes the document an index; otherwise it is a
/// leaf. Only `<loc>` elements that are direct children of `<sitemap>`
/// (index) or `<url>` (leaf) are collected, so extension entries such as
/// `<image:loc>` are ignored. Names are matched without their namespace
/// prefix.
///
/// # Returns
///
/// * `Ok(SitemapNode)` - The classified document
/// * `Err(SitemapError::Malformed)` - The XML is not well formed
/// * `Err(SitemapError::Empty)` - The document has no elements at all
///
/// # Example
///
/// ```
/// use sitemap_mirror::sitemap::{parse_sitemap, SitemapNode};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// let node = parse_sitemap(xml).unwrap();
/// assert_eq!(node, SitemapNode::Leaf(vec!["https://example.com/a".to_string()]));
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapNode, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut saw_element = false;
    let mut saw_sitemap = false;
    let mut sitemap_locs = Vec::new();
    let mut page_locs = Vec::new();
    let mut current_loc: Option<(LocOwner, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                saw_element = true;
                if name == b"sitemap" {
                    saw_sitemap = true;
                }
                if name == b"loc" && current_loc.is_none() {
                    current_loc = LocOwner::from_parent(open.last()).map(|o| (o, String::new()));
                }
                open.push(name);
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                if e.local_name().as_ref() == b"sitemap" {
                    saw_sitemap = true;
                }
            }
            Ok(Event::End(_)) => {
                let closed = open.pop();
                if closed.as_deref() == Some(b"loc".as_slice()) {
                    if let Some((owner, text)) = current_loc.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            match owner {
                                LocOwner::Sitemap => sitemap_locs.push(text.to_string()),
                                LocOwner::Url => page_locs.push(text.to_string()),
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = current_loc.as_mut() {
                    let unescaped = t.unescape().map_err(|e| SitemapError::Malformed {
                        message: e.to_string(),
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some((_, text)) = current_loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Malformed {
                    message: format!("at byte {}: {}", reader.buffer_position(), e),
                });
            }
            _ => {}
        }
    }

    if !saw_element {
        return Err(SitemapError::Empty);
    }

    if let Some(unclosed) = open.last() {
        return Err(SitemapError::Malformed {
            message: format!(
                "document ended inside <{}>",
                String::from_utf8_lossy(unclosed)
            ),
        });
    }

    if saw_sitemap {
        Ok(SitemapNode::Index(sitemap_locs))
    } else {
        Ok(SitemapNode::Leaf(page_locs))
    }
}
