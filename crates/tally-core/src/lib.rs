pub mod ai;
pub mod chat;
pub mod config;
pub mod profile;
pub mod provider;
pub mod reveal;
pub mod state;

// Re-export main types for convenience
pub use ai::{client_for, CompletionClient, CompletionRequest, GeminiClient, OllamaClient};
pub use chat::{ChatStatus, ChatWidget};
pub use config::{Config, Settings};
pub use profile::{FirmProfile, SectionId};
pub use provider::Provider;
pub use reveal::{IntersectionObserver, RevealThreshold, RowSpan, ScrollReveal, Viewport};
pub use state::{ChatMessage, ChatRole};
