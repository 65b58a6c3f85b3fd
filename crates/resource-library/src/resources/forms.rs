use serde::Deserialize;

use crate::accounts::UserId;

use super::domain::NewSuggestion;

pub const MAX_COMPANY_NAME_CHARS: usize = 40;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Raw suggestion form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionForm {
    #[serde(default)]
    pub suggested_company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_url: String,
}

impl SuggestionForm {
    /// Field errors, one line per problem; empty when the form is valid.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let name = self.suggested_company_name.trim();
        if name.is_empty() {
            errors.push("suggested_company_name: this field is required".to_string());
        } else if name.chars().count() > MAX_COMPANY_NAME_CHARS {
            errors.push(format!(
                "suggested_company_name: at most {MAX_COMPANY_NAME_CHARS} characters"
            ));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("description: this field is required".to_string());
        } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.push(format!(
                "description: at most {MAX_DESCRIPTION_CHARS} characters"
            ));
        }

        if !is_web_url(self.company_url.trim()) {
            errors.push("company_url: enter a valid http or https URL".to_string());
        }

        errors
    }

    pub fn into_suggestion(self, author: UserId) -> NewSuggestion {
        NewSuggestion {
            suggested_company_name: self.suggested_company_name.trim().to_string(),
            description: self.description.trim().to_string(),
            company_url: self.company_url.trim().to_string(),
            author,
        }
    }
}

fn is_web_url(value: &str) -> bool {
    let Some(rest) = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    else {
        return false;
    };
    if rest.contains(char::is_whitespace) {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let (host, port) = if authority.starts_with('[') {
        match authority.split_once(']') {
            Some((inner, "")) => (inner, None),
            Some((inner, tail)) => match tail.strip_prefix(':') {
                Some(port) => (inner, Some(port)),
                None => return false,
            },
            None => return false,
        }
    } else {
        match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };
    if let Some(port) = port {
        if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    match host.strip_prefix('[') {
        Some(ipv6) => !ipv6.is_empty() && ipv6.chars().all(|c| c.is_ascii_hexdigit() || c == ':'),
        None => is_domain(host),
    }
}

/// Dot-separated labels of letters, digits and inner hyphens.
fn is_domain(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host.trim_end_matches('.').split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
