use crate::types::Background;

pub struct ThemeDefinition {
    pub css: String,
    /// Extra class for the header wordmark.
    pub wordmark_class: &'static str,
}

/// Base palette plus the selected backdrop.
pub fn theme_definition(background: &Background) -> ThemeDefinition {
    let backdrop = format!(
        "body {{ background-image: linear-gradient(rgba(0, 0, 0, 0.55), rgba(0, 0, 0, 0.75)), url(\"{}\"); }}",
        css_url(&background.path)
    );
    let wordmark_class = if background.id == "goldrush" {
        "header-wordmark header-wordmark-muted"
    } else {
        "header-wordmark"
    };
    ThemeDefinition {
        css: format!("{GOLD_THEME}\n{backdrop}"),
        wordmark_class,
    }
}

/// Quotes and backslashes would end the `url("...")` early.
fn css_url(path: &str) -> String {
    path.chars()
        .filter(|c| !matches!(c, '"' | '\\' | '\n' | '\r'))
        .collect()
}

const GOLD_THEME: &str = r#"
:root {
    --color-bg-primary: #05030a;
    --color-bg-secondary: rgba(15, 10, 25, 0.85);
    --color-bg-overlay: rgba(0, 0, 0, 0.7);
    --color-text-primary: #ffffff;
    --color-text-muted: #bfb8a5;
    --color-gold: #ffd700;
    --color-gold-soft: rgba(255, 215, 0, 0.25);
    --color-border: rgba(255, 215, 0, 0.35);
    --color-input-bg: rgba(0, 0, 0, 0.6);
    --color-chat-user-bg: #ffd700;
    --color-chat-user-text: #000000;
    --color-chat-assistant-bg: rgba(20, 15, 30, 0.9);
    --color-chat-assistant-text: #ffffff;
    --color-error-bg: rgba(120, 20, 20, 0.85);
    --color-timestamp: #9b9b9b;
}
body {
    background-color: var(--color-bg-primary);
    background-size: cover;
    background-position: center;
    background-attachment: fixed;
    color: var(--color-text-primary);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::AVAILABLE_BACKGROUNDS;

    #[test]
    fn backdrop_uses_the_selected_image() {
        let space = AVAILABLE_BACKGROUNDS.iter().find(|bg| bg.id == "space").unwrap();
        let theme = theme_definition(space);
        assert!(theme.css.contains("url(\"/backgrounds/space.jpg\")"));
        assert!(theme.css.contains("--color-gold"));
        assert_eq!(theme.wordmark_class, "header-wordmark");
    }

    #[test]
    fn quotes_cannot_escape_the_url() {
        let hostile = Background {
            id: "x".into(),
            name: "x".into(),
            path: "a\"); color: red; (\"".into(),
            thumbnail: String::new(),
        };
        let theme = theme_definition(&hostile);
        assert!(theme.css.contains("url(\"a); color: red; (\")"));
    }
}
