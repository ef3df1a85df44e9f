// handlers/protected/ai/mod.rs - Proxy to the text generation provider

pub mod chat; // POST /ai/chat
pub mod insights; // POST /ai/insights

pub use chat::chat_post;
pub use insights::insights_post;
