//! Pure HTML-to-text extraction.
//!
//! Both functions are total: any input — malformed markup, empty strings,
//! documents with no matching elements — yields a String, worst case empty.
//! `scraper`'s parser never fails, it just builds the best tree it can.

use scraper::{ElementRef, Html, Selector};

/// Extract headings (h1–h3) and paragraphs as a flat text corpus.
///
/// Elements appear in document order, trimmed, each followed by a blank-line
/// separator. Elements whose trimmed text is empty contribute nothing.
pub fn extract_content(html: &str) -> String {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("h1, h2, h3, p").unwrap_or_else(|_| unreachable!());

    let mut content = String::new();
    for el in doc.select(&sel) {
        let text = element_text(&el);
        if !text.is_empty() {
            content.push_str(&text);
            content.push_str("\n\n");
        }
    }
    content
}

/// Extract Q/A pairs from FAQ-shaped markup.
///
/// Scans heading-like elements (h2–h4 and `dt`) in document order; a heading
/// whose immediate next sibling element is a `p` or `dd` emits a
/// `Q:`/`A:` pair. A page yielding zero pairs falls back to
/// [`extract_content`] so it still produces something useful as context.
pub fn extract_faq(html: &str) -> String {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("h2, h3, h4, dt").unwrap_or_else(|_| unreachable!());

    let mut faq = String::new();
    for heading in doc.select(&sel) {
        let Some(answer) = next_sibling_element(&heading) else {
            continue;
        };
        let tag = answer.value().name();
        if tag == "p" || tag == "dd" {
            faq.push_str("Q: ");
            faq.push_str(&element_text(&heading));
            faq.push_str("\nA: ");
            faq.push_str(&element_text(&answer));
            faq.push_str("\n\n");
        }
    }

    if faq.is_empty() {
        extract_content(html)
    } else {
        faq
    }
}

/// The element's text content (nested text included), trimmed.
fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The next sibling that is an element, skipping text and comment nodes.
fn next_sibling_element<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}
