//! Response phase: attach, merge or strip pagination metadata.

use serde_json::{Map, Value};

use super::config::Config;
use super::{Count, Pagination};
use crate::response::Body;

/// Keys this middleware owns inside the metadata object.
const OWNED_KEYS: [&str; 3] = ["page", "limit", "found"];

/// Builds `{ page, limit, found? }` in that order.
pub(crate) fn meta_object(pagination: Pagination, count: Option<Count>) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("page".to_owned(), pagination.page.into());
    meta.insert("limit".to_owned(), pagination.limit.into());
    if let Some(Count(found)) = count {
        meta.insert("found".to_owned(), found.into());
    }
    meta
}

/// The body as the composer sees it.
enum Shape {
    /// A JSON object.
    Mapping(Map<String, Value>),
    /// Any other JSON value; text bodies become JSON strings.
    Other(Value),
}

/// Applies an approving verdict.
///
/// `Empty` and `Bytes` bodies are not JSON and are left alone.
pub(crate) fn attach(body: &mut Body, meta: Map<String, Value>, config: &Config) {
    let shape = match std::mem::replace(body, Body::Empty) {
        Body::Json(Value::Object(map)) => Shape::Mapping(map),
        Body::Json(value) => Shape::Other(value),
        Body::Text(text) => Shape::Other(Value::String(text)),
        untouched @ (Body::Empty | Body::Bytes(..)) => {
            *body = untouched;
            return;
        }
    };

    let enriched = match shape {
        Shape::Mapping(mut map) if map.contains_key(&config.meta_key) => {
            match map.get_mut(&config.meta_key) {
                Some(Value::Object(existing)) => existing.extend(meta),
                Some(other) => *other = Value::Object(meta),
                None => {}
            }
            map
        }
        Shape::Mapping(map) => wrap(Value::Object(map), meta, config),
        Shape::Other(value) => wrap(value, meta, config),
    };
    *body = Body::Json(Value::Object(enriched));
}

fn wrap(original: Value, meta: Map<String, Value>, config: &Config) -> Map<String, Value> {
    let mut envelope = Map::with_capacity(2);
    envelope.insert(config.meta_key.clone(), Value::Object(meta));
    envelope.insert(config.results_key.clone(), original);
    envelope
}

/// Applies a rejecting verdict: removes `page`, `limit` and `found` from an
/// existing metadata object. Everything else is left as it was.
pub(crate) fn strip(body: &mut Body, config: &Config) {
    let Body::Json(Value::Object(map)) = body else {
        return;
    };
    if let Some(Value::Object(meta)) = map.get_mut(&config.meta_key) {
        for key in OWNED_KEYS {
            meta.shift_remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::response::ContentType;

    const DEFAULTS: Pagination = Pagination { page: 1, limit: 100 };

    fn attached(body: Body, count: Option<Count>, config: &Config) -> Body {
        let mut body = body;
        attach(&mut body, meta_object(DEFAULTS, count), config);
        body
    }

    fn serialised(body: &Body) -> String {
        match body {
            Body::Json(v) => serde_json::to_string(v).unwrap(),
            other => panic!("expected json, got {other:?}"),
        }
    }

    #[test]
    fn wraps_text() {
        let body = attached(Body::Text("ok".into()), None, &Config::default());
        assert_eq!(serialised(&body), r#"{"meta":{"page":1,"limit":100},"results":"ok"}"#);
    }

    #[test]
    fn wraps_arrays_and_scalars_unchanged() {
        let cfg = Config::default();
        for original in [json!([1, 2, 3]), json!(42), json!(null), json!(true)] {
            let body = attached(Body::Json(original.clone()), None, &cfg);
            assert_eq!(body, Body::Json(json!({
                "meta": { "page": 1, "limit": 100 },
                "results": original,
            })));
        }
    }

    #[test]
    fn wraps_object_without_meta_key_meta_first() {
        let body = attached(Body::Json(json!({ "this": "that" })), None, &Config::default());
        assert_eq!(
            serialised(&body),
            r#"{"meta":{"page":1,"limit":100},"results":{"this":"that"}}"#,
        );
    }

    #[test]
    fn merges_into_existing_meta_preserving_fields_and_order() {
        let original = json!({
            "meta": { "provided_by": "company", "domain": "example.com" },
            "results": "ok",
        });
        let body = attached(Body::Json(original), None, &Config::default());
        assert_eq!(
            serialised(&body),
            r#"{"meta":{"provided_by":"company","domain":"example.com","page":1,"limit":100},"results":"ok"}"#,
        );
    }

    #[test]
    fn merge_overwrites_same_named_fields() {
        let original = json!({ "meta": { "page": 99, "found": 7, "note": "x" }, "data": [] });
        let body = attached(Body::Json(original), None, &Config::default());
        assert_eq!(body, Body::Json(json!({
            "meta": { "page": 1, "found": 7, "note": "x", "limit": 100 },
            "data": [],
        })));
    }

    #[test]
    fn non_object_meta_is_replaced() {
        let body = attached(Body::Json(json!({ "meta": "legacy", "results": 1 })), None, &Config::default());
        assert_eq!(body, Body::Json(json!({
            "meta": { "page": 1, "limit": 100 },
            "results": 1,
        })));
    }

    #[test]
    fn found_only_when_counted() {
        let cfg = Config::default();
        let counted = attached(Body::Text("ok".into()), Some(Count(250)), &cfg);
        assert_eq!(
            serialised(&counted),
            r#"{"meta":{"page":1,"limit":100,"found":250},"results":"ok"}"#,
        );

        let uncounted = attached(Body::Text("ok".into()), None, &cfg);
        let Body::Json(v) = uncounted else { panic!("expected json") };
        assert!(v["meta"].get("found").is_none());
    }

    #[test]
    fn custom_keys() {
        let cfg = Config {
            meta_key: "Some Name".into(),
            results_key: "output".into(),
            ..Config::default()
        };
        let body = attached(Body::Text("ok".into()), None, &cfg);
        assert_eq!(
            serialised(&body),
            r#"{"Some Name":{"page":1,"limit":100},"output":"ok"}"#,
        );
    }

    #[test]
    fn non_json_bodies_pass_through() {
        let cfg = Config::default();
        assert_eq!(attached(Body::Empty, None, &cfg), Body::Empty);
        let csv = Body::Bytes(ContentType::Csv, b"a,b\n".to_vec());
        assert_eq!(attached(csv.clone(), None, &cfg), csv);
    }

    #[test]
    fn strip_removes_only_owned_keys() {
        let mut body = Body::Json(json!({
            "meta": { "important": "yes", "page": 2, "limit": 5, "found": 9 },
            "results": { "this": "that" },
        }));
        strip(&mut body, &Config::default());
        assert_eq!(body, Body::Json(json!({
            "meta": { "important": "yes" },
            "results": { "this": "that" },
        })));
    }

    #[test]
    fn strip_keeps_empty_meta_object() {
        let mut body = Body::Json(json!({ "meta": { "page": 1, "limit": 100 } }));
        strip(&mut body, &Config::default());
        assert_eq!(body, Body::Json(json!({ "meta": {} })));
    }

    #[test]
    fn strip_is_idempotent() {
        let cfg = Config::default();
        let mut body = Body::Json(json!({ "meta": { "important": "yes", "page": 1 }, "x": 1 }));
        strip(&mut body, &cfg);
        let once = body.clone();
        strip(&mut body, &cfg);
        assert_eq!(body, once);
    }

    #[test]
    fn strip_leaves_other_bodies_alone() {
        let cfg = Config::default();
        for original in [
            Body::Text("ok".into()),
            Body::Json(json!({ "this": "that" })),
            Body::Json(json!({ "meta": "legacy" })),
            Body::Json(json!([{ "meta": { "page": 1 } }])),
            Body::Empty,
        ] {
            let mut body = original.clone();
            strip(&mut body, &cfg);
            assert_eq!(body, original);
        }
    }
}
