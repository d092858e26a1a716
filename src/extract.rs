use scraper::{Html, Selector};

use crate::error::Error;

/// Returns the outer HTML of the first element in `document` matching `selector`.
///
/// A selector that matches nothing yields an empty string, which still
/// fingerprints to a stable digest. The document is decoded lossily and
/// html5ever recovers from any markup, so only the selector can fail.
///
/// # Errors
///
/// Returns [`Error::Selector`] if `selector` is not valid CSS.
pub fn extract(document: &[u8], selector: &str) -> Result<String, Error> {
    let parsed =
        Selector::parse(selector).map_err(|e| Error::selector(selector, format!("{e:?}")))?;

    let html = String::from_utf8_lossy(document);
    let document = Html::parse_document(&html);

    Ok(document
        .select(&parsed)
        .next()
        .map(|element| element.html())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &[u8] = br#"<html><body>
        <ul id="news"><li>first</li><li>second</li></ul>
        <p class="note">a</p><p class="note">b</p>
    </body></html>"#;

    #[test]
    fn test_extract_returns_outer_html() {
        let fragment = extract(PAGE, "#news").unwrap();
        assert!(fragment.starts_with("<ul id=\"news\">"));
        assert!(fragment.contains("<li>second</li>"));
        assert!(fragment.ends_with("</ul>"));
    }

    #[test]
    fn test_extract_only_first_match() {
        assert_eq!(extract(PAGE, "p.note").unwrap(), "<p class=\"note\">a</p>");
    }

    #[test]
    fn test_extract_no_match_is_empty() {
        assert_eq!(extract(PAGE, "#missing").unwrap(), "");
    }

    #[test]
    fn test_extract_tolerates_broken_markup() {
        let fragment = extract(b"<div id=x><span>unclosed", "#x").unwrap();
        assert!(fragment.contains("unclosed"));
    }

    #[test]
    fn test_extract_invalid_selector() {
        let err = extract(PAGE, "[[invalid").unwrap_err();
        assert!(matches!(err, Error::Selector { ref selector, .. } if selector == "[[invalid"));
    }
}
