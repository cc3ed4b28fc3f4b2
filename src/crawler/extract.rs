//! Content extractor
//!
//! Walks the parsed HTML tree in document order (depth-first,
//! left-to-right) collecting the page title, visible text fragments and
//! outgoing anchor URLs. Descent stops at `script` and `style` elements;
//! the `title` element contributes the title, not body text.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use url::Url;

/// Everything extracted from one page
#[derive(Debug, Default)]
pub struct PageContent {
    /// First text node under the first `title` element
    pub title: String,
    /// Visible text fragments, in document order
    pub text: Vec<String>,
    /// Anchor targets resolved to absolute http(s) URLs, in document order
    pub anchors: Vec<Url>,
}

impl PageContent {
    /// The page body handed to the vectorizer: fragments joined as-is.
    pub fn body_text(&self) -> String {
        self.text.concat()
    }
}

/// Extracts title, visible text and anchor URLs from an HTML document.
///
/// `base` is the page's resolved URL, used for relative href resolution.
/// Hrefs that fail to parse or resolve to a non-http(s) scheme are dropped.
pub fn extract(html: &str, base: &Url) -> PageContent {
    let document = Html::parse_document(html);
    let mut content = PageContent::default();
    walk(document.tree.root(), base, &mut content);
    content
}

fn walk(node: NodeRef<'_, Node>, base: &Url, out: &mut PageContent) {
    match node.value() {
        Node::Element(el) => match el.name() {
            // Nothing under these is visible text
            "script" | "style" => return,

            "title" => {
                if out.title.is_empty() {
                    for child in node.children() {
                        if let Node::Text(text) = child.value() {
                            out.title = text.to_string();
                            break;
                        }
                    }
                }
                return;
            }

            "a" => {
                if let Some(href) = el.attr("href") {
                    match base.join(href) {
                        Ok(resolved)
                            if resolved.scheme() == "http" || resolved.scheme() == "https" =>
                        {
                            out.anchors.push(resolved);
                        }
                        Ok(resolved) => {
                            tracing::debug!(href, scheme = %resolved.scheme(), "skipping non-http anchor");
                        }
                        Err(e) => {
                            tracing::debug!(href, error = %e, "failed to resolve anchor href");
                        }
                    }
                }
                // Anchor text is still visible: keep descending
            }

            _ => {}
        },

        Node::Text(text) => {
            out.text.push(text.to_string());
            return;
        }

        _ => {}
    }

    for child in node.children() {
        walk(child, base, out);
    }
}
