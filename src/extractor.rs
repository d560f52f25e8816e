use regex::Regex;

/// Text-level helpers shared by the result and detail page parsers.
pub struct Extractor {
    email_regex: Regex,
    phone_regex: Regex,
    school_district_suffix: Regex,
    district_suffix: Regex,
    whitespace: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        // All patterns are literals; a failure here is a programming error.
        Extractor {
            email_regex: Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap(),
            // North American numbers, area code and separators optional:
            // (916) 555-1234, 916-555-1234, 9165551234, 555-1234
            phone_regex: Regex::new(r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)\s?|\d{3}[-.\s]?)?\d{3}[-.\s]?\d{4}").unwrap(),
            school_district_suffix: Regex::new(r"(?i)\s+school\s+district$").unwrap(),
            district_suffix: Regex::new(r"(?i)\s+district$").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Strips trailing "School District" / "District" so the directory's own
    /// naming ("Manteca Unified") matches what spreadsheets tend to hold.
    pub fn clean_search_term(&self, term: &str) -> String {
        let cleaned = term.trim();
        let cleaned = self.school_district_suffix.replace(cleaned, "");
        let cleaned = self.district_suffix.replace(cleaned.trim(), "");
        let cleaned = self.whitespace.replace_all(cleaned.trim(), " ").trim().to_string();

        if cleaned.is_empty() {
            self.whitespace.replace_all(term.trim(), " ").to_string()
        } else {
            cleaned
        }
    }

    /// Lowercased with runs of whitespace collapsed, for loose comparisons.
    pub fn normalize(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").to_lowercase()
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .find(|email| {
                !email.ends_with(".png") && !email.ends_with(".jpg") && !email.ends_with(".jpeg") && !email.ends_with(".gif") && !email.ends_with(".webp")
            })
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        for m in self.phone_regex.find_iter(text) {
            // Reject matches glued to other digits, e.g. the tail of a ZIP+4.
            let preceded_by_digit = text[..m.start()].chars().next_back().map_or(false, |c| c.is_ascii_digit());
            let followed_by_digit = text[m.end()..].chars().next().map_or(false, |c| c.is_ascii_digit());
            if preceded_by_digit || followed_by_digit {
                continue;
            }

            let phone = m.as_str().trim().to_string();
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if (7..=11).contains(&digits) {
                return Some(phone);
            }
        }
        None
    }

    /// Splits rendered cell text into trimmed, non-empty lines.
    pub fn lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.lines().map(|s| s.trim()).filter(|s| !s.is_empty()).collect()
    }
}
