use serde::Deserialize;

use super::{GenerationConfig, GenerationRequest};

pub const CHAT_FALLBACK: &str = "I'm sorry, I couldn't generate a response at this time.";
pub const INSIGHTS_FALLBACK: &str = "Unable to generate insights at this time.";

const CHAT_SYSTEM_PROMPT: &str = "You are an expert backend development AI assistant. You specialize in:

1. API Development (REST, GraphQL, WebSocket)
2. Database Design & Optimization
3. Authentication & Security
4. Cloud Deployment & DevOps
5. Performance Optimization
6. Code Generation & Best Practices

Provide practical, actionable advice with code examples when appropriate. Focus on modern technologies like:
- Node.js, Python, Go, Java, C#
- Express, FastAPI, Gin, Spring Boot, .NET
- PostgreSQL, MongoDB, Redis
- AWS, Google Cloud, Azure
- Docker, Kubernetes
- JWT, OAuth, API Security

Always consider scalability, security, and maintainability in your responses.";

const CHAT_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
    max_output_tokens: 2048,
};

/// A note as submitted for analysis; missing fields are treated as empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Wrap the user's question in the assistant system prompt
pub fn chat_request(message: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: format!("{CHAT_SYSTEM_PROMPT}\n\nUser question: {message}"),
        config: Some(CHAT_CONFIG),
    }
}

/// Ask for themes, patterns and next steps across the given notes
pub fn insights_request(notes: &[InsightNote]) -> GenerationRequest {
    let notes_content = notes
        .iter()
        .map(|note| format!("Title: {}\nContent: {}", note.title, note.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let prompt = format!(
        "Analyze the following notes and provide insights about patterns, themes, and suggestions for the user. Be concise and helpful:

{notes_content}

Please provide:
1. Main themes or topics
2. Patterns you notice
3. Suggestions for organization or next steps
4. Any interesting observations

Keep the response under 200 words and make it actionable."
    );

    GenerationRequest { prompt, config: None }
}
