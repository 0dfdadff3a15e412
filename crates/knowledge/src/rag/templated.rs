//! Deterministic markdown formatting of retrieved entries.

use super::responder::{no_information_message, Responder};
use crate::category::first_match;
use crate::types::ScoredMatch;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Services,
    Contact,
    Team,
    About,
    Technology,
    General,
}

const HEADER_RULES: &[(&[&str], Header)] = &[
    (
        &["service", "services", "offer", "provide", "solution"],
        Header::Services,
    ),
    (
        &["contact", "reach", "email", "phone", "address"],
        Header::Contact,
    ),
    (&["team", "people", "staff", "who", "member"], Header::Team),
    (&["about", "company", "background", "history"], Header::About),
    (
        &["technology", "tech", "tools", "platform"],
        Header::Technology,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Contact,
    Person,
    Service,
}

const SHAPE_RULES: &[(&[&str], Shape)] = &[
    (&["email", "phone", "contact"], Shape::Contact),
    (
        &["ceo", "director", "lead", "engineer", "manager"],
        Shape::Person,
    ),
    (&["service", "solution"], Shape::Service),
];

/// Role keywords that mark a line as naming a person.
const TITLE_KEYWORDS: &[&str] = &["ceo", "director", "lead", "engineer", "manager", "sde"];

const FOOTER_RULE: &str = "\n---";
const FOOTER_HINT: &str =
    "💡 *Need more specific information? Feel free to ask about any particular aspect!*";

/// Formats matches as a markdown answer without calling any model.
#[derive(Debug, Clone)]
pub struct TemplatedResponder {
    company: String,
}

impl TemplatedResponder {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
        }
    }

    /// Format an answer from matched entry texts, in match order.
    pub fn format<S: AsRef<str>>(&self, query: &str, contents: &[S]) -> String {
        if contents.is_empty() {
            return no_information_message(&self.company);
        }

        let mut parts = Vec::with_capacity(contents.len() + 3);
        parts.push(self.header(query));

        for content in contents {
            parts.push(format_content(content.as_ref().trim()));
        }

        parts.push(FOOTER_RULE.to_string());
        parts.push(FOOTER_HINT.to_string());

        parts.join("\n\n")
    }

    fn header(&self, query: &str) -> String {
        let lower = query.to_lowercase();
        match first_match(&lower, HEADER_RULES).unwrap_or(Header::General) {
            Header::Services => format!("## {} Services & Solutions", self.company),
            Header::Contact => "## Contact Information".to_string(),
            Header::Team => "## Team Information".to_string(),
            Header::About => format!("## About {}", self.company),
            Header::Technology => "## Technologies & Platforms".to_string(),
            Header::General => "## Information Found".to_string(),
        }
    }
}

#[async_trait]
impl Responder for TemplatedResponder {
    fn name(&self) -> &str {
        "templated"
    }

    async fn respond(&self, query: &str, matches: &[ScoredMatch<'_>]) -> String {
        let contents: Vec<&str> = matches.iter().map(|m| m.entry.content.as_str()).collect();
        self.format(query, &contents)
    }
}

fn format_content(content: &str) -> String {
    let lower = content.to_lowercase();
    match first_match(&lower, SHAPE_RULES) {
        Some(Shape::Contact) => format_contact(content),
        Some(Shape::Person) => format_people(content),
        Some(Shape::Service) => format_sentences(content, "🔹", 10),
        None => format_sentences(content, "•", 5),
    }
}

fn format_contact(content: &str) -> String {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.contains('@') {
                format!("📧 **Email:** {}", line)
            } else if line.chars().any(|c| c.is_ascii_digit()) && line.chars().count() > 8 {
                format!("📞 **Phone:** {}", line)
            } else {
                format!("• {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_people(content: &str) -> String {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for line in content.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        if TITLE_KEYWORDS.iter().any(|t| lower.contains(t)) {
            lines.extend(pending.take());
            pending = Some(format_person(line));
        } else {
            lines.extend(pending.take());
            lines.push(format!("• {}", line));
        }
    }

    lines.extend(pending);
    lines.join("\n")
}

/// "Jane Doe Lead Engineer" -> name "Jane Doe", title "Lead Engineer";
/// "Jane Doe CEO" -> name "Jane Doe", title "CEO".
fn format_person(line: &str) -> String {
    let parts: Vec<&str> = line.split(' ').collect();
    let (name, title) = match parts.len() {
        0..=2 => return format!("👤 **{}**", line),
        3 => (parts[..2].join(" "), parts[2].to_string()),
        n => (parts[..n - 2].join(" "), parts[n - 2..].join(" ")),
    };
    format!("👤 **{}** - *{}*", name, title)
}

fn format_sentences(content: &str, bullet: &str, min_chars: usize) -> String {
    content
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > min_chars)
        .map(|s| format!("{} {}", bullet, s))
        .collect::<Vec<_>>()
        .join("\n")
}
