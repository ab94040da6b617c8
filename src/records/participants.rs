use serde::{Deserialize, Serialize};

pub const DEFAULT_ORGANIZATION: &str = "GoPhygital";
pub const DEFAULT_DEPARTMENT: &str = "IT";
pub const DEFAULT_EMAIL_DOMAIN: &str = "gmail.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub organization: String,
    pub department: String,
    pub email: String,
}

impl Participant {
    fn with_defaults(
        name: &str,
        organization: Option<&str>,
        department: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            organization: organization.unwrap_or(DEFAULT_ORGANIZATION).to_string(),
            department: department.unwrap_or(DEFAULT_DEPARTMENT).to_string(),
            email: email
                .map(str::to_string)
                .unwrap_or_else(|| default_email(name)),
        }
    }
}

fn default_email(name: &str) -> String {
    let local: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    format!("{}@{}", local, DEFAULT_EMAIL_DOMAIN)
}

/// Parses `"Name - Organization - Department - email, Name2 - ..."`.
///
/// Missing, empty or dash-only fields take the defaults. Entries without a
/// name are dropped. Text that yields no entry at all becomes one participant
/// named after the whole text.
pub fn parse_participants(text: &str) -> Vec<Participant> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let parsed: Vec<Participant> = text
        .split(',')
        .filter_map(|entry| {
            let fields: Vec<Option<&str>> = split_fields(entry).into_iter().map(present).collect();
            let name = fields.first().copied().flatten()?;
            let at = |i: usize| fields.get(i).copied().flatten();
            Some(Participant::with_defaults(name, at(1), at(2), at(3)))
        })
        .collect();

    if parsed.is_empty() {
        log::debug!("Participants text had no parsable entry, keeping it whole");
        return vec![Participant::with_defaults(text, None, None, None)];
    }

    parsed
}

fn present(field: &str) -> Option<&str> {
    let field = field.trim();
    if field.is_empty() || field.chars().all(|c| c == '-') {
        None
    } else {
        Some(field)
    }
}

/// Splits on dashes that stand alone between whitespace (or the ends of the
/// entry), so hyphenated names and e-mail domains stay intact.
fn split_fields(entry: &str) -> Vec<&str> {
    let bytes = entry.as_bytes();
    let mut fields = Vec::new();
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'-' {
            continue;
        }
        let before = i == 0 || bytes[i - 1].is_ascii_whitespace();
        let after = i + 1 == bytes.len() || bytes[i + 1].is_ascii_whitespace();
        if before && after {
            fields.push(&entry[start..i]);
            start = i + 1;
        }
    }
    fields.push(&entry[start..]);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_partial_entries() {
        let parsed = parse_participants("Asha Rao - Acme - Sales - asha@acme.com, Ben - - -");

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0],
            Participant {
                name: "Asha Rao".into(),
                organization: "Acme".into(),
                department: "Sales".into(),
                email: "asha@acme.com".into(),
            }
        );
        assert_eq!(parsed[1].name, "Ben");
        assert_eq!(parsed[1].organization, "GoPhygital");
        assert_eq!(parsed[1].department, "IT");
        assert_eq!(parsed[1].email, "ben@gmail.com");
    }

    #[test]
    fn hyphens_inside_words_are_not_separators() {
        let parsed = parse_participants("Mary-Jane - Acme-Corp - R&D - mj@acme-corp.com");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Mary-Jane");
        assert_eq!(parsed[0].organization, "Acme-Corp");
        assert_eq!(parsed[0].email, "mj@acme-corp.com");
    }

    #[test]
    fn positional_gaps_keep_later_fields() {
        let parsed = parse_participants("Ben - - Ops");

        assert_eq!(parsed[0].organization, "GoPhygital");
        assert_eq!(parsed[0].department, "Ops");
    }

    #[test]
    fn name_only_entries_get_generated_email() {
        let parsed = parse_participants("Asha Rao,  Ben ");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].email, "asharao@gmail.com");
        assert_eq!(parsed[1].name, "Ben");
    }

    #[test]
    fn unparsable_text_degrades_to_single_participant() {
        let parsed = parse_participants(" - , -");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "- , -");
        assert_eq!(parsed[0].organization, DEFAULT_ORGANIZATION);
    }

    #[test]
    fn empty_text_has_no_participants() {
        assert!(parse_participants("   ").is_empty());
    }
}
