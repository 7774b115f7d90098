// tests/normalize_projection.rs
use fanout_producer::ingest::fallback_payload;
use fanout_producer::normalize::normalize;
use serde_json::json;
use std::fs;

#[test]
fn five_posts_become_five_blog_post_envelopes() {
    let json = fs::read_to_string("tests/fixtures/jsonplaceholder_posts.json").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    // Take what the provider would hand over: the first five records.
    let payload = serde_json::Value::Array(parsed.as_array().unwrap()[..5].to_vec());

    let out = normalize("jsonplaceholder", &payload);

    assert_eq!(out.len(), 5);
    for env in &out {
        assert_eq!(env.source, "jsonplaceholder");
        assert_eq!(env.message_type, "blog_post");
        assert!(env.data.get("content").is_some(), "body maps to content");
        assert!(env.data.get("user_id").is_some(), "userId maps to user_id");
        assert!(
            env.data.get("body").is_none(),
            "envelope data is a projection, not the raw record"
        );
    }
}

#[test]
fn single_weather_record_becomes_one_envelope() {
    let json = fs::read_to_string("tests/fixtures/weather_london.json").unwrap();
    let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

    let out = normalize("weather", &payload);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].message_type, "weather_data");
    assert_eq!(out[0].data["location"], "London");
    assert_eq!(out[0].data["temperature"], json!(289.41));
    assert_eq!(out[0].data["description"], "light rain");
}

#[test]
fn demo_fallback_becomes_two_demo_envelopes() {
    let out = normalize("demo", &fallback_payload());

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|e| e.message_type == "demo_data"));
    assert_eq!(out[0].data["title"], "Demo Post 1");
}

#[test]
fn unrecognized_source_yields_empty_for_any_payload() {
    assert!(normalize("unknown", &json!([{"id": 1}])).is_empty());
    assert!(normalize("unknown", &json!({"id": 1})).is_empty());
    assert!(normalize("unknown", &json!(null)).is_empty());
}

#[test]
fn renormalizing_differs_only_in_processed_at() {
    let payload = json!([{"id": 1, "title": "t", "body": "b", "userId": 9}]);

    let first = normalize("jsonplaceholder", &payload);
    let second = normalize("jsonplaceholder", &payload);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.source, b.source);
        assert_eq!(a.message_type, b.message_type);
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn envelope_serializes_with_type_field() {
    let payload = json!([{"id": 1}]);
    let out = normalize("jsonplaceholder", &payload);
    let wire: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&out[0]).unwrap()).unwrap();

    assert_eq!(wire["type"], "blog_post");
    assert_eq!(wire["source"], "jsonplaceholder");
    assert!(wire["processed_at"].is_string());
}
