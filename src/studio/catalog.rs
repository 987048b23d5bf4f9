use super::types::{ContentMode, PodcastStyle};

/// A selectable podcast style with its display copy.
#[derive(Debug, Clone)]
pub struct StyleOption {
    pub id: PodcastStyle,
    pub name: &'static str,
    pub description: &'static str,
}

/// A selectable content-input mode with its display copy.
#[derive(Debug, Clone)]
pub struct ContentOption {
    pub id: ContentMode,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn podcast_styles() -> Vec<StyleOption> {
    vec![
        StyleOption {
            id: PodcastStyle::Expert,
            name: "Expert Discussion",
            description: "Professional, in-depth analysis with expert insights",
        },
        StyleOption {
            id: PodcastStyle::Casual,
            name: "Casual Conversation",
            description: "Fun, engaging dialogue with relatable examples",
        },
        StyleOption {
            id: PodcastStyle::Narrative,
            name: "Narrative Journey",
            description: "Engaging storytelling that weaves facts into a narrative",
        },
    ]
}

pub fn content_modes() -> Vec<ContentOption> {
    vec![
        ContentOption {
            id: ContentMode::Text,
            name: "Paste Text",
            description: "Copy and paste your article, blog post, or written content",
        },
        ContentOption {
            id: ContentMode::File,
            name: "Upload Document",
            description: "Select a file (PDF, DOC, or TXT) from your device",
        },
        ContentOption {
            id: ContentMode::Url,
            name: "Enter URL",
            description: "Import content directly from a webpage",
        },
    ]
}
