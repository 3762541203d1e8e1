use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// The `EmailExtractor` struct scans raw page content for contact email
/// addresses. It runs two independent passes (a pattern match over the
/// full text and a scan of `mailto:` anchors) and unions the results with
/// set semantics, keeping first-seen order with the regex pass first.
pub struct EmailExtractor {
    /// The email-shaped pattern applied to the page text.
    pattern: Regex,
    /// The selector matching anchor elements with a `mailto:` target.
    mailto: Selector,
}

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[a-z]{2,}";

/// Local parts that mark a sender nobody should write back to.
const NO_REPLY_PREFIXES: [&str; 3] = ["noreply", "no-reply", "donotreply"];

impl Default for EmailExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(EMAIL_PATTERN).unwrap(),
            mailto: Selector::parse(r#"a[href^="mailto:"]"#).unwrap(),
        }
    }
}

impl EmailExtractor {
    /// Extracts the deduplicated list of actionable email addresses from
    /// the given page content.
    ///
    /// # Arguments
    ///
    /// * `html` - The raw page content to be scanned.
    ///
    /// # Returns
    ///
    /// The surviving addresses in first-seen order. Candidates matching the
    /// placeholder denylist (the reserved `example.com` domain, no-reply
    /// local parts) are dropped.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        for found in self.pattern.find_iter(html) {
            let candidate = found.as_str();
            if seen.insert(candidate.to_string()) {
                emails.push(candidate.to_string());
            }
        }

        let document = Html::parse_document(html);
        for element in document.select(&self.mailto) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(candidate) = self.mailto_target(href) else {
                continue;
            };
            if seen.insert(candidate.clone()) {
                emails.push(candidate);
            }
        }

        emails.retain(|email| !is_placeholder(email));
        emails
    }

    /// Strips the `mailto:` scheme and any trailing query string, then
    /// requires the remainder to be a full match of the email pattern.
    fn mailto_target(&self, href: &str) -> Option<String> {
        let scheme = "mailto:";
        let prefix = href.get(..scheme.len())?;
        if !prefix.eq_ignore_ascii_case(scheme) {
            return None;
        }

        let address = href[scheme.len()..].split('?').next().unwrap_or_default();

        match self.pattern.find(address) {
            Some(m) if m.start() == 0 && m.end() == address.len() => Some(address.to_string()),
            _ => None,
        }
    }
}

fn is_placeholder(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return true;
    };

    if domain.eq_ignore_ascii_case("example.com") {
        return true;
    }

    let local = local.to_ascii_lowercase();
    NO_REPLY_PREFIXES
        .iter()
        .any(|prefix| local.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_and_mailto_union() {
        let html = r#"
            <html><body>
                <p>Write to contact@b.test for details.</p>
                <a href="mailto:sales@b.test?subject=hi">Sales</a>
            </body></html>
        "#;

        let extractor = EmailExtractor::default();
        let emails = extractor.extract(html);

        assert_eq!(emails, vec!["contact@b.test", "sales@b.test"]);
    }

    #[test]
    fn test_duplicate_across_passes_kept_once() {
        let html = r#"
            <p>Mail info@site.org today.</p>
            <a href="mailto:info@site.org">info@site.org</a>
        "#;

        let extractor = EmailExtractor::default();
        let emails = extractor.extract(html);

        assert_eq!(emails, vec!["info@site.org"]);
    }

    #[test]
    fn test_placeholders_are_dropped() {
        let html = r#"
            <p>demo@example.com or Demo@Example.com</p>
            <p>noreply@b.test no-reply@b.test donotreply@b.test</p>
            <p>NoReply@b.test noreply123@b.test</p>
            <p>real.person@b.test</p>
        "#;

        let extractor = EmailExtractor::default();
        let emails = extractor.extract(html);

        assert_eq!(emails, vec!["real.person@b.test"]);
    }

    #[test]
    fn test_subdomain_of_example_domain_survives() {
        let extractor = EmailExtractor::default();
        let emails = extractor.extract("<p>team@mail.example.com</p>");

        assert_eq!(emails, vec!["team@mail.example.com"]);
    }

    #[test]
    fn test_malformed_mailto_targets_rejected() {
        let html = r#"
            <a href="mailto:">empty</a>
            <a href="mailto:not-an-address">bad</a>
            <a href="mailto:Jane Doe <jane@site.org>">wrapped</a>
            <a href="tel:+15550100">phone</a>
        "#;

        let extractor = EmailExtractor::default();
        // the wrapped form still surfaces through the text pass
        assert_eq!(extractor.extract(html), vec!["jane@site.org"]);
    }

    #[test]
    fn test_uppercase_tld_not_matched() {
        let extractor = EmailExtractor::default();
        assert!(extractor.extract("<p>person@site.COM</p>").is_empty());
    }
}
