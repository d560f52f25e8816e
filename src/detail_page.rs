use log::{debug, info};
use scraper::{ElementRef, Html, Node, Selector};
use crate::config::SiteConfig;
use crate::error::{ConfigError, LookupError};
use crate::extractor::Extractor;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Contact {
    /// Cells in column order: name, title, email, phone.
    pub fn cells(&self) -> [String; 4] {
        [
            self.name.clone().unwrap_or_default(),
            self.title.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
        ]
    }
}

/// Pulls contact details out of a district's detail page.
///
/// The directory lays contacts out as `<tr><th class="details-field-label">
/// Superintendent</th><td>...</td></tr>`, where the cell holds the person's
/// name on its first line, followed by phone and a `mailto:` link.
pub struct DetailParser {
    label_selector: Selector,
    mailto_selector: Selector,
    labels: Vec<String>,
    extractor: Extractor,
}

impl DetailParser {
    pub fn new(site: &SiteConfig) -> Result<Self, ConfigError> {
        let label_selector = Selector::parse(&site.field_label_selector)
            .map_err(|_| ConfigError::Selector(site.field_label_selector.clone()))?;
        let mailto_selector = Selector::parse("a[href^='mailto:']")
            .map_err(|_| ConfigError::Selector("a[href^='mailto:']".to_string()))?;

        Ok(DetailParser {
            label_selector,
            mailto_selector,
            labels: site.contact_labels.iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect(),
            extractor: Extractor::new(),
        })
    }

    pub fn extract(&self, html: &str) -> Result<Contact, LookupError> {
        let document = Html::parse_document(html);

        for label in &self.labels {
            let Some(cell) = self.find_cell(&document, label) else {
                debug!("{} section not found", label);
                continue;
            };

            let contact = self.parse_cell(cell, label);
            if contact.name.is_some() {
                info!("Found: {}, Name: '{}'", label, contact.name.as_deref().unwrap_or_default());
                return Ok(contact);
            }
            debug!("{} info incomplete", label);
        }

        Err(LookupError::NoContactData)
    }

    /// The `td` following the label header whose text contains `label`.
    fn find_cell<'a>(&self, document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
        let wanted = label.to_lowercase();
        document
            .select(&self.label_selector)
            .filter(|th| th.text().collect::<String>().to_lowercase().contains(&wanted))
            .find_map(|th| {
                th.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|el| el.value().name() == "td")
            })
    }

    fn parse_cell(&self, cell: ElementRef<'_>, label: &str) -> Contact {
        let text = render_text(cell);
        let lines = self.extractor.lines(&text);

        let email = cell
            .select(&self.mailto_selector)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| {
                let address = href.trim_start_matches("mailto:");
                address.split('?').next().unwrap_or(address).trim().to_string()
            })
            .find(|address| !address.is_empty())
            .or_else(|| self.extractor.extract_email(&text));

        Contact {
            name: lines.first().map(|l| l.to_string()),
            title: Some(label.to_string()),
            email,
            phone: self.extractor.extract_phone(&text),
        }
    }
}

/// Approximates the browser's rendered text: whitespace collapsed inside text
/// runs, line breaks at `<br>` and block elements.
fn render_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        match node.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if collapsed.is_empty() {
                    continue;
                }
                if !out.is_empty() && !out.ends_with('\n') && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(&collapsed);
            }
            Node::Element(el) if matches!(el.name(), "br" | "p" | "div" | "li" | "tr") => {
                out.push('\n');
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"
        <html><body>
          <h1 class="page-title">Manteca Unified</h1>
          <table>
            <tr><th class="details-field-label">County</th><td>San Joaquin</td></tr>
            <tr>
              <th class="details-field-label">Chief Business Official</th>
              <td>Victoria Brunn<br/>Phone: (209) 858-0700<br/><a href="mailto:vbrunn@mantecausd.net">vbrunn@mantecausd.net</a></td>
            </tr>
            <tr>
              <th class="details-field-label">Superintendent</th>
              <td>
                Clark   Burke
                <br>
                Superintendent's Office
                <br>
                (209) 858-0700 ext. 14
                <br>
                <a href="mailto:cburke@mantecausd.net?subject=Hello">Email</a>
              </td>
            </tr>
          </table>
        </body></html>
    "#;

    fn parser() -> DetailParser {
        DetailParser::new(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn extracts_first_configured_label() {
        let contact = parser().extract(DETAIL).unwrap();
        assert_eq!(
            contact,
            Contact {
                name: Some("Clark Burke".to_string()),
                title: Some("Superintendent".to_string()),
                email: Some("cburke@mantecausd.net".to_string()),
                phone: Some("(209) 858-0700".to_string()),
            }
        );
    }

    #[test]
    fn falls_back_to_next_label() {
        let html = DETAIL.replace(">Superintendent<", ">Assistant<");
        let contact = parser().extract(&html).unwrap();
        assert_eq!(contact.name.as_deref(), Some("Victoria Brunn"));
        assert_eq!(contact.title.as_deref(), Some("Chief Business Official"));
        assert_eq!(contact.email.as_deref(), Some("vbrunn@mantecausd.net"));
    }

    #[test]
    fn missing_fields_stay_blank() {
        let html = r#"<table><tr><th class="details-field-label">Superintendent</th><td>Pat Lee</td></tr></table>"#;
        let contact = parser().extract(html).unwrap();
        assert_eq!(contact.name.as_deref(), Some("Pat Lee"));
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone, None);
        assert_eq!(contact.cells(), ["Pat Lee".to_string(), "Superintendent".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn email_from_text_when_no_mailto() {
        let html = r#"<table><tr><th class="details-field-label">Superintendent</th><td>Pat Lee<br>pat@district.org</td></tr></table>"#;
        let contact = parser().extract(html).unwrap();
        assert_eq!(contact.email.as_deref(), Some("pat@district.org"));
    }

    #[test]
    fn empty_cell_or_no_labels_is_no_data() {
        let p = parser();
        let empty = r#"<table><tr><th class="details-field-label">Superintendent</th><td>  </td></tr></table>"#;
        assert_eq!(p.extract(empty), Err(LookupError::NoContactData));
        assert_eq!(p.extract("<p>Page moved</p>"), Err(LookupError::NoContactData));
    }
}
