//! Request body shaping for the tracker's REST API.
//!
//! Kept pure so payload composition is testable without a network. The
//! comment envelope is the tracker's rich-text document format; callers treat
//! it as opaque.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Attachments above this cap are rejected before any upload is attempted.
/// Deliberately just under the platform's own 10 MB limit.
pub const ATTACHMENT_MAX_BYTES: u64 = 9_900_000;

/// Summary used when the user confirmed a ticket with an empty description.
pub const EMPTY_SUMMARY_FALLBACK: &str = "Звернення з чат-бота";

/// Status label that marks a ticket as finished; compared case-insensitively.
pub const DONE_STATUS_SENTINEL: &str = "Готово";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Form fields collected by the dialogue and mapped into a create call.
pub struct TicketFields {
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: String,
}

/// Derives the ticket summary as the first non-empty line of the accumulated
/// description, falling back to a fixed literal.
pub fn derive_summary(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(EMPTY_SUMMARY_FALLBACK)
        .to_string()
}

pub fn is_done_status(label: &str) -> bool {
    label.trim().to_lowercase() == DONE_STATUS_SENTINEL.to_lowercase()
}

pub fn build_create_issue_body(
    project_key: &str,
    issue_type: &str,
    reporter_account_id: Option<&str>,
    fields: &TicketFields,
) -> Value {
    let description = compose_issue_description(fields);
    let mut issue_fields = json!({
        "project": { "key": project_key },
        "issuetype": { "name": issue_type },
        "summary": derive_summary(&fields.description),
        "description": description,
    });
    if let Some(account_id) = reporter_account_id
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        issue_fields["reporter"] = json!({ "accountId": account_id });
    }
    json!({ "fields": issue_fields })
}

/// The user's description first (its first line is the summary), then the
/// requester block collected by the form.
fn compose_issue_description(fields: &TicketFields) -> String {
    format!(
        "{}\n\nПідрозділ: {}\nДепартамент: {}\nСервіс: {}\nЗаявник: {}",
        fields.description.trim_end(),
        fields.division,
        fields.department,
        fields.service,
        fields.full_name
    )
}

pub fn build_comment_body(text: &str) -> Value {
    json!({
        "body": {
            "type": "doc",
            "version": 1,
            "content": [
                {
                    "type": "paragraph",
                    "content": [ { "type": "text", "text": text } ]
                }
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_derive_summary_takes_first_non_empty_line() {
        assert_eq!(derive_summary("Принтер не працює\nдруга лінія\n"), "Принтер не працює");
        assert_eq!(derive_summary("\n  \nактуальний рядок\n"), "актуальний рядок");
    }

    #[test]
    fn unit_derive_summary_falls_back_when_description_is_empty() {
        assert_eq!(derive_summary(""), EMPTY_SUMMARY_FALLBACK);
        assert_eq!(derive_summary("   \n \n"), EMPTY_SUMMARY_FALLBACK);
    }

    #[test]
    fn unit_is_done_status_compares_case_insensitively() {
        assert!(is_done_status("Готово"));
        assert!(is_done_status(" готово "));
        assert!(is_done_status("ГОТОВО"));
        assert!(!is_done_status("В роботі"));
    }

    #[test]
    fn functional_create_issue_body_maps_fields_and_reporter() {
        let fields = TicketFields {
            division: "Київ".to_string(),
            department: "ІТ департамент".to_string(),
            service: "E-mix 2.x".to_string(),
            full_name: "Іван Франко".to_string(),
            description: "Принтер не працює\n".to_string(),
        };
        let body = build_create_issue_body("SUP", "tgtask", Some("acc-9"), &fields);
        assert_eq!(body["fields"]["project"]["key"], "SUP");
        assert_eq!(body["fields"]["issuetype"]["name"], "tgtask");
        assert_eq!(body["fields"]["summary"], "Принтер не працює");
        assert_eq!(body["fields"]["reporter"]["accountId"], "acc-9");
        let description = body["fields"]["description"].as_str().expect("description");
        assert!(description.starts_with("Принтер не працює"));
        assert!(description.contains("Підрозділ: Київ"));
        assert!(description.contains("Заявник: Іван Франко"));
    }

    #[test]
    fn functional_create_issue_body_omits_reporter_when_absent() {
        let body = build_create_issue_body("SUP", "tgtask", None, &TicketFields::default());
        assert!(body["fields"].get("reporter").is_none());
        assert_eq!(body["fields"]["summary"], EMPTY_SUMMARY_FALLBACK);
    }

    #[test]
    fn unit_comment_body_wraps_text_in_document_envelope() {
        let body = build_comment_body("hello");
        assert_eq!(body["body"]["type"], "doc");
        assert_eq!(body["body"]["version"], 1);
        assert_eq!(body["body"]["content"][0]["content"][0]["text"], "hello");
    }
}
