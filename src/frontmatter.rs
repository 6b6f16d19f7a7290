//! Front-matter extraction for Markdown posts.
//!
//! A post may begin with a fenced YAML block:
//!
//! ```text
//! ---
//! title: Coffee & Compilers
//! tags:
//! - rust
//! ---
//! Body starts here.
//! ```
//!
//! [`parse`] splits a document into that block (as an ordered JSON object)
//! and the body. The grammar is strict about where a block may appear — the
//! opening fence must be the very first line — and lenient about everything
//! else: a missing or unterminated fence, YAML that fails to parse, or a
//! block that is not a mapping all yield an empty map with the input text
//! passed through untouched.

use serde_json::{Map, Value};

/// Split a document into its front-matter map and body.
pub fn parse(text: &str) -> (Map<String, Value>, String) {
    let Some(rest) = strip_open_fence(text) else {
        return (Map::new(), text.to_string());
    };
    let Some((yaml_src, body)) = split_close_fence(rest) else {
        return (Map::new(), text.to_string());
    };

    if yaml_src.trim().is_empty() {
        return (Map::new(), body.to_string());
    }

    match serde_yaml::from_str::<serde_yaml::Value>(yaml_src) {
        Ok(serde_yaml::Value::Mapping(mapping)) => (mapping_to_map(&mapping), body.to_string()),
        Ok(_) => {
            tracing::warn!("front-matter block is not a mapping, treating whole file as content");
            (Map::new(), text.to_string())
        }
        Err(e) => {
            tracing::warn!(
                "failed to parse front-matter, treating whole file as content: {}",
                e
            );
            (Map::new(), text.to_string())
        }
    }
}

/// Reassemble a document from a front-matter map and body. The inverse of
/// [`parse`] for documents whose YAML is already in serde_yaml's canonical
/// layout; an empty map yields the body alone.
pub fn compose(front_matter: &Map<String, Value>, body: &str) -> String {
    if front_matter.is_empty() {
        return body.to_string();
    }
    match serde_yaml::to_string(front_matter) {
        Ok(yaml) => format!("---\n{}---\n{}", yaml, body),
        Err(e) => {
            tracing::warn!("failed to serialize front-matter, emitting body only: {}", e);
            body.to_string()
        }
    }
}

/// Strip the opening fence line. The fence must be the very first line of
/// the document; a leading blank line disqualifies the block.
fn strip_open_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(after) => Some(after),
        None if rest.is_empty() => Some(""),
        None => None,
    }
}

/// Find the closing fence inside `rest` (the text after the opening fence).
/// Returns the raw YAML source and the body following the fence line. The
/// closing line must be exactly `---`.
fn split_close_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        if content == "---" {
            let yaml_src = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml_src, body));
        }
        offset += line.len();
    }
    None
}

/// Convert a YAML mapping into an ordered JSON object. Scalar keys are
/// stringified; entries with composite keys are dropped.
fn mapping_to_map(mapping: &serde_yaml::Mapping) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in mapping {
        let name = match key {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Number(n) => n.to_string(),
            _ => continue,
        };
        map.insert(name, yaml_to_json(value));
    }
    map
}

/// Recursively convert a YAML value into JSON. YAML-only constructs are
/// flattened: tags are dropped, non-finite floats become null.
fn yaml_to_json(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => Value::Object(mapping_to_map(mapping)),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_block() {
        let text = "---\ntitle: Hello World\ntags:\n- rust\n- blog\n---\nBody text.\n";
        let (fm, body) = parse(text);
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Hello World"));
        let tags: Vec<&str> = fm["tags"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(tags, ["rust", "blog"]);
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_no_block_passes_through() {
        let text = "Just a document.\n\nWith paragraphs.";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_fence_must_open_the_document() {
        let text = "\n---\ntitle: x\n---\nbody";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_unterminated_block_passes_through() {
        let text = "---\ntitle: x\nno closing fence";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_unparseable_yaml_passes_through() {
        let text = "---\ntitle: [unclosed\n---\nbody";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_empty_block() {
        let text = "---\n---\nbody";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_non_mapping_block_passes_through() {
        let text = "---\n- just\n- a list\n---\nbody";
        let (fm, body) = parse(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_crlf_fences() {
        let text = "---\r\ntitle: x\r\n---\r\nbody";
        let (fm, body) = parse(text);
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("x"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_key_order_preserved() {
        let text = "---\nzebra: 1\napple: 2\nmango: 3\n---\n";
        let (fm, _) = parse(text);
        let keys: Vec<&str> = fm.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_nested_values() {
        let text = "---\nauthor:\n  name: Ada\n  links:\n  - https://example.com\ncount: 3\ndraft: false\n---\nbody";
        let (fm, _) = parse(text);
        assert_eq!(fm["author"]["name"], "Ada");
        assert_eq!(fm["count"], 3);
        assert_eq!(fm["draft"], false);
    }

    #[test]
    fn test_block_closed_at_eof() {
        let text = "---\ntitle: x\n---";
        let (fm, body) = parse(text);
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("x"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_is_idempotent_on_the_body() {
        let (_, body) = parse("---\ntitle: x\n---\nno fences left here\n");
        let (fm, body_again) = parse(&body);
        assert!(fm.is_empty());
        assert_eq!(body_again, body);
    }

    #[test]
    fn test_compose_round_trip() {
        let text = "---\ntitle: Hello World\ntags:\n- rust\n- blog\n---\nBody text.\n";
        let (fm, body) = parse(text);
        assert_eq!(compose(&fm, &body), text);
    }

    #[test]
    fn test_compose_without_front_matter() {
        let (fm, body) = parse("plain body");
        assert_eq!(compose(&fm, &body), "plain body");
    }
}
