use serde_json::json;

/// Passes the local shape check, never valid against the real API.
pub const API_KEY: &str = "AIzaSyA-1234567890abcdefghijklmnopqrs";

/// A `generateContent` response body with a single candidate made of `texts`.
pub fn completion_fixture(texts: &[&str]) -> String {
    let parts = texts
        .iter()
        .map(|text| return json!({ "text": text }))
        .collect::<Vec<_>>();

    return json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 4,
            "totalTokenCount": 16
        }
    })
    .to_string();
}

/// An error body in the shape the Gemini API returns.
pub fn error_fixture(code: u16, status: &str, message: &str) -> String {
    return json!({
        "error": {
            "code": code,
            "message": message,
            "status": status
        }
    })
    .to_string();
}
