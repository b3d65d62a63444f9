#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Provider::Gemini),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini (Google)",
            Provider::Ollama => "Ollama (Local)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-3-flash-preview",
            Provider::Ollama => "llama3.2:latest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Provider::from_str("Gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str(" OLLAMA "), Some(Provider::Ollama));
        assert_eq!(Provider::from_str("claude"), None);
    }

    #[test]
    fn as_str_round_trips() {
        for provider in [Provider::Gemini, Provider::Ollama] {
            assert_eq!(Provider::from_str(provider.as_str()), Some(provider));
        }
    }
}
