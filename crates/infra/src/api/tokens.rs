//! Embedded token extraction
//!
//! The backend returns tokens in several places depending on the endpoint.
//! Locations are tried in a fixed order and the first match wins:
//!
//! 1. top-level `access` + `refresh`
//! 2. `data.access` + `data.refresh`
//! 3. `data.tokens.access` + `data.tokens.refresh`
//! 4. a single `token` / `access_token`, at the top level or under `data`
//!
//! Empty strings never count as tokens.

use debtwise_domain::TokenPair;
use serde_json::{Map, Value};

type Object = Map<String, Value>;
type Rule = fn(&Object) -> Option<TokenPair>;

const RULES: &[(&str, Rule)] = &[
    ("top_level_pair", top_level_pair),
    ("data_pair", data_pair),
    ("data_tokens_pair", data_tokens_pair),
    ("single_token", single_token),
];

/// Scan a parsed response body for embedded tokens.
pub fn extract_tokens(body: &Value) -> Option<TokenPair> {
    tokens_in(body.as_object()?)
}

/// [`extract_tokens`] over a body already known to be an object.
pub fn tokens_in(object: &Map<String, Value>) -> Option<TokenPair> {
    RULES.iter().find_map(|(name, rule)| {
        let tokens = rule(object)?;
        tracing::debug!(rule = *name, "tokens found in response body");
        Some(tokens)
    })
}

/// Tokens from a refresh exchange response.
///
/// Accepts everything [`extract_tokens`] does plus a lone top-level `access`
/// or `access_token`, which is how the refresh endpoint answers when it does
/// not rotate the refresh token.
pub fn extract_refreshed(body: &Value) -> Option<TokenPair> {
    let object = body.as_object()?;
    tokens_in(object).or_else(|| {
        let access = string_field(object, "access").or_else(|| string_field(object, "access_token"))?;
        Some(TokenPair::new(access, refresh_sibling(object)))
    })
}

fn top_level_pair(object: &Object) -> Option<TokenPair> {
    pair(object)
}

fn data_pair(object: &Object) -> Option<TokenPair> {
    pair(object.get("data")?.as_object()?)
}

fn data_tokens_pair(object: &Object) -> Option<TokenPair> {
    pair(object.get("data")?.get("tokens")?.as_object()?)
}

fn single_token(object: &Object) -> Option<TokenPair> {
    single(object).or_else(|| single(object.get("data")?.as_object()?))
}

fn pair(object: &Object) -> Option<TokenPair> {
    let access = string_field(object, "access")?;
    let refresh = string_field(object, "refresh")?;
    Some(TokenPair::new(access, Some(refresh)))
}

fn single(object: &Object) -> Option<TokenPair> {
    let access = string_field(object, "token").or_else(|| string_field(object, "access_token"))?;
    Some(TokenPair::new(access, refresh_sibling(object)))
}

fn refresh_sibling(object: &Object) -> Option<String> {
    string_field(object, "refresh_token").or_else(|| string_field(object, "refresh"))
}

fn string_field(object: &Object, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tokens(access: &str, refresh: Option<&str>) -> Option<TokenPair> {
        Some(TokenPair::new(access, refresh.map(str::to_string)))
    }

    #[test]
    fn top_level_pair_is_found() {
        let body = json!({"access": "A", "refresh": "R", "user": {"id": 1}});
        assert_eq!(extract_tokens(&body), tokens("A", Some("R")));
    }

    #[test]
    fn data_pair_is_found() {
        let body = json!({"data": {"access": "A", "refresh": "R"}});
        assert_eq!(extract_tokens(&body), tokens("A", Some("R")));
    }

    #[test]
    fn nested_tokens_pair_is_found() {
        let body = json!({"data": {"tokens": {"access": "A1", "refresh": "R1"}, "user": {}}});
        assert_eq!(extract_tokens(&body), tokens("A1", Some("R1")));
    }

    #[test]
    fn single_token_top_level_and_under_data() {
        assert_eq!(extract_tokens(&json!({"token": "T"})), tokens("T", None));
        assert_eq!(extract_tokens(&json!({"data": {"access_token": "T"}})), tokens("T", None));
        assert_eq!(
            extract_tokens(&json!({"access_token": "T", "refresh_token": "R"})),
            tokens("T", Some("R"))
        );
    }

    #[test]
    fn earlier_rule_wins() {
        let body = json!({
            "access": "top",
            "refresh": "top-r",
            "data": {"tokens": {"access": "nested", "refresh": "nested-r"}}
        });
        assert_eq!(extract_tokens(&body), tokens("top", Some("top-r")));
    }

    #[test]
    fn lone_access_is_not_an_embedded_pair() {
        let body = json!({"access": "A"});
        assert_eq!(extract_tokens(&body), None);
        assert_eq!(extract_refreshed(&body), tokens("A", None));
    }

    #[test]
    fn non_objects_and_empty_values_yield_nothing() {
        assert_eq!(extract_tokens(&json!([{"access": "A", "refresh": "R"}])), None);
        assert_eq!(extract_tokens(&json!({"access": "", "refresh": "R"})), None);
        assert_eq!(extract_tokens(&json!({"token": 42})), None);
        assert_eq!(extract_tokens(&Value::Null), None);
    }
}
