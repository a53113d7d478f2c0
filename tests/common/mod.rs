//! Mock backends shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::{Request, Respond, ResponseTemplate};

/// Deterministic stand-in for a translation: `hello` -> `[fr] HELLO`.
pub fn fake_translation(text: &str, target: &str) -> String {
    format!("[{}] {}", target, text.to_uppercase())
}

/// Numbered source strings `msg-0`, `msg-1`, ...
pub fn numbered_strings(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("msg-{}", i)).collect()
}

fn query_value(request: &Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Free endpoint: answers each `q` with one translated sentence.
pub struct FreeEndpointResponder;

impl Respond for FreeEndpointResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let text = query_value(request, "q").unwrap_or_default();
        let target = query_value(request, "tl").unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!([
            [[fake_translation(&text, &target), text, null, null, 1]],
            null,
            "en"
        ]))
    }
}

/// Paid API: translates every entry of `q`, wrapped in `data`.
pub struct PaidApiResponder;

impl Respond for PaidApiResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let target = body["target"].as_str().unwrap_or_default();
        let translations: Vec<Value> = body["q"]
            .as_array()
            .unwrap()
            .iter()
            .map(|text| {
                json!({ "translatedText": fake_translation(text.as_str().unwrap(), target) })
            })
            .collect();

        ResponseTemplate::new(200)
            .set_body_json(json!({ "data": { "translations": translations } }))
    }
}

/// Cloud API: translates every entry of `texts`.
pub struct CloudApiResponder;

impl Respond for CloudApiResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let target = body["targetLanguageCode"].as_str().unwrap_or_default();
        let translations: Vec<Value> = body["texts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|text| json!({ "text": fake_translation(text.as_str().unwrap(), target) }))
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({ "translations": translations }))
    }
}

/// Length of the JSON array at `field` in a recorded request body
pub fn batch_len(request: &Request, field: &str) -> usize {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body[field].as_array().map(Vec::len).unwrap_or(0)
}
