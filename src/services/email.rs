//! Best-effort contact email extraction from detail pages.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

/// Asset names like `logo@2x.png` have the address shape.
const IMAGE_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

/// All distinct email-shaped substrings of `text`, sorted.
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|email| {
            let lower = email.to_ascii_lowercase();
            !IMAGE_SUFFIXES.iter().any(|ext| lower.ends_with(ext))
        })
        .map(str::to_string)
        .collect()
}

/// Representative contact address of a page.
///
/// Picks the lexicographically smallest match. The choice is arbitrary but
/// stable; nothing ties "smallest" to "most relevant".
pub fn pick_email(text: &str) -> Option<String> {
    extract_emails(text).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_smallest_match() {
        let html = "<p>Kontakt: zed@x.com</p><a href=\"mailto:abc@x.com\">abc@x.com</a>";
        assert_eq!(pick_email(html).as_deref(), Some("abc@x.com"));
    }

    #[test]
    fn deduplicates_matches() {
        let emails = extract_emails("a@b.de, a@b.de; c@d.org");
        assert_eq!(emails.len(), 2);
    }

    #[test]
    fn ignores_image_names() {
        let html = r#"<img src="/img/logo@2x.png"> <img src="x@3x.WEBP"> bewerbung@firma.de"#;
        assert_eq!(
            extract_emails(html).into_iter().collect::<Vec<_>>(),
            vec!["bewerbung@firma.de"]
        );
    }

    #[test]
    fn none_without_addresses() {
        assert_eq!(pick_email("<html><body>Keine Adresse</body></html>"), None);
        assert_eq!(pick_email("user@localhost"), None);
    }

    #[test]
    fn matches_ascii_letters_only() {
        // Kelvin sign and long s case-fold to ASCII letters.
        assert_eq!(pick_email("hr@firma.\u{212A}\u{212A}"), None);
        assert_eq!(pick_email("jobſ@firma.de"), None);
        assert_eq!(
            extract_emails("bewerbung@firma.de, hr@firma.\u{212A}om")
                .into_iter()
                .collect::<Vec<_>>(),
            vec!["bewerbung@firma.de"]
        );
    }

    #[test]
    fn keeps_original_case() {
        assert_eq!(
            pick_email("Jobs@Firma.DE").as_deref(),
            Some("Jobs@Firma.DE")
        );
    }
}
