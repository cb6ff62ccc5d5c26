/*
Embedded push-notification copy.

This module provides:
- A tiny embedded translations store for EN/TR (compile-time embedded JSON).
- `tr` to look up a key in a language with optional `{name}` parameters.

Usage:
    use crate::i18n;
    let title = i18n::tr(None, "push.friend_request.title", None);
    let body = i18n::tr(Some("tr"), "push.friend_request.body", Some(&[("sender", "Alice")]));

Notes:
- Placeholders use single-brace format: `{name}`.
- Parameters are substituted in one pass, so a value that itself contains
  `{amount}` is inserted verbatim and never expanded.
- Default language is `en`. A key missing in the requested language falls back
  to the default language, then to the key itself.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const EN_JSON: &str = r#"
{
  "placeholder.user": "Someone",
  "push.friend_request.title": "New Friend Request",
  "push.friend_request.body": "{sender} sent you a friend request.",
  "push.new_debt.title": "New Debt Notification",
  "push.new_debt.body": "{from} added a debt of {amount} to you.",
  "push.group_debt.title": "New Debt Notification",
  "push.group_debt.body": "{from} added a group debt of {amount} to you.",
  "push.debt_paid.title": "Debt Payment Awaiting Confirmation",
  "push.debt_paid.body": "{from} has paid their debt of {amount} to you."
}
"#;

const TR_JSON: &str = r#"
{
  "placeholder.user": "Bir kullanıcı",
  "push.friend_request.title": "Yeni Arkadaşlık İsteği",
  "push.friend_request.body": "{sender} size arkadaşlık isteği gönderdi, uygulamaya girip onaylayabilirsiniz.",
  "push.new_debt.title": "Yeni Borç Bildirimi",
  "push.new_debt.body": "{from} size {amount} tutarında borç ekledi.",
  "push.group_debt.title": "Yeni Borç Bildirimi",
  "push.group_debt.body": "{from} size {amount} tutarında grup borcu ekledi.",
  "push.debt_paid.title": "Borç Ödemesi Onay Bekliyor",
  "push.debt_paid.body": "{from} size olan {amount} tutarındaki borcunu ödedi."
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    let tr_map: HashMap<String, String> = serde_json::from_str(TR_JSON).unwrap_or_else(|e| {
        panic!("failed to parse TR_JSON in i18n module: {}", e);
    });
    out.insert("tr".to_string(), tr_map);

    out
}

/// Returns the global translations map (lang -> (key -> message)).
fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "tr-TR" -> "tr").
pub fn normalize_language(lang: &str) -> String {
    lang.split(['-', '_']).next().unwrap_or(lang).to_lowercase()
}

/// Replace `{name}` placeholders in a single left-to-right pass.
/// Unknown placeholders and unmatched braces are kept as they are.
fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match params.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Translate a key using an explicit language (or default if None).
///
/// Returns the translated and parameter-substituted string. If no translation is found,
/// returns the default-language value or the key itself.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.map(normalize_language);
    let desired = desired.as_deref().unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)))
        .map(String::as_str)
        .unwrap_or(key);

    match params {
        Some(params) => substitute(val, params),
        None => val.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tr_basic() {
        assert_eq!(
            tr(Some("tr"), "push.friend_request.title", None),
            "Yeni Arkadaşlık İsteği"
        );
        assert_eq!(tr(None, "push.friend_request.title", None), "New Friend Request");
    }

    #[test]
    fn test_tr_with_params() {
        let s = tr(
            None,
            "push.new_debt.body",
            Some(&[("from", "Bob"), ("amount", "50")]),
        );
        assert_eq!(s, "Bob added a debt of 50 to you.");
    }

    #[test]
    fn test_fallback_to_default() {
        let s = tr(Some("fr"), "push.debt_paid.title", None);
        assert_eq!(s, "Debt Payment Awaiting Confirmation");
    }

    #[test]
    fn region_tags_resolve_to_base_language() {
        assert_eq!(tr(Some("tr-TR"), "placeholder.user", None), "Bir kullanıcı");
    }

    #[test]
    fn missing_key_returns_key() {
        let k = "non.existent.key";
        assert_eq!(tr(None, k, None), k.to_string());
    }

    #[test]
    fn parameter_values_are_not_expanded() {
        let s = tr(
            None,
            "push.group_debt.body",
            Some(&[("from", "{amount}"), ("amount", "12")]),
        );
        assert_eq!(s, "{amount} added a group debt of 12 to you.");
    }

    #[test]
    fn unknown_placeholders_and_broken_braces_survive() {
        assert_eq!(substitute("Hi {who} {", &[("x", "y")]), "Hi {who} {");
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("en-US"), "en");
        assert_eq!(normalize_language("TR_tr"), "tr");
        assert_eq!(normalize_language("en"), "en");
    }
}
