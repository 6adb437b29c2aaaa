//! Wire types for the two chat providers.
//!
//! These serialize/deserialize directly to/from the JSON payloads expected by
//! an OpenAI-compatible `/chat/completions` endpoint and by Ollama's native
//! `/api/chat` endpoint. Both exchanges carry exactly two messages: one
//! system prompt and one user prompt.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message roles
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction message.
    System,
    /// End-user message.
    User,
    /// Assistant/model message.
    Assistant,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single message in the exchange. Both providers accept this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Author role for this turn.
    pub role: Role,
    /// Text content. Providers may return null content on the reply side.
    pub content: Option<String>,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completion request / response
// ---------------------------------------------------------------------------

/// Request body for POST /chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier used for request routing.
    pub model: String,
    /// The system + user exchange sent to the model.
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response body from POST /chat/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Ranked response choices.
    pub choices: Vec<Choice>,
}

/// A single choice in the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Assistant message payload for this choice.
    pub message: Message,
    /// Provider stop reason (`stop`, `length`, etc.).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Ollama native chat request / response
// ---------------------------------------------------------------------------

/// Request body for POST /api/chat on a local Ollama server.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// Always false; the reply is consumed as a single JSON document.
    pub stream: bool,
}

/// Response body from POST /api/chat.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    /// Assistant message; absent on some error-shaped responses.
    #[serde(default)]
    pub message: Option<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verifies optional fields are omitted when absent during request serialization.
    #[test]
    fn serialize_chat_request() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::system("You are helpful."), Message::user("Hi")],
            temperature: Some(0.3),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["temperature"], 0.3);
    }

    #[test]
    fn serialize_chat_request_omits_absent_temperature() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::user("Hi")],
            temperature: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
    }

    // Verifies standard assistant text responses deserialize correctly.
    #[test]
    fn deserialize_chat_response() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hello!"));
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    // Verifies a null-content choice survives deserialization.
    #[test]
    fn deserialize_chat_response_with_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }

    #[test]
    fn serialize_ollama_request_pins_stream_false() {
        let req = OllamaChatRequest {
            model: "llama3".into(),
            messages: vec![Message::system("sys"), Message::user("usr")],
            stream: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn deserialize_ollama_response() {
        let json = r#"{
            "model": "llama3",
            "message": {"role": "assistant", "content": "hi there"},
            "done": true
        }"#;
        let resp: OllamaChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.message.unwrap().content.as_deref(),
            Some("hi there")
        );
    }

    // Ollama error bodies carry no message field at all.
    #[test]
    fn deserialize_ollama_response_without_message() {
        let resp: OllamaChatResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(resp.message.is_none());
    }

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, Role::System);
        assert_eq!(sys.content.as_deref(), Some("hello"));

        let usr = Message::user("world");
        assert_eq!(usr.role, Role::User);
    }
}
