use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;

use crate::issue::IssueState;

pub const PREVIEW_LIMIT: usize = 200;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelColor {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const DEFAULT_LABEL_COLOR: LabelColor = LabelColor {
    background: "#eeeeee",
    foreground: "#333333",
};

/// Report categories used as labels on the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Safety,
    StreetLight,
    Road,
    MirrorSign,
    Park,
    Garbage,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Safety,
        Category::StreetLight,
        Category::Road,
        Category::MirrorSign,
        Category::Park,
        Category::Garbage,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Safety => "安全",
            Self::StreetLight => "街灯・照明",
            Self::Road => "道路・歩道",
            Self::MirrorSign => "カーブミラー・標識",
            Self::Park => "公園・緑地",
            Self::Garbage => "ゴミ・不法投棄",
            Self::Other => "その他",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Safety => "safety",
            Self::StreetLight => "street-light",
            Self::Road => "road",
            Self::MirrorSign => "mirror-sign",
            Self::Park => "park",
            Self::Garbage => "garbage",
            Self::Other => "other",
        }
    }

    pub fn color(self) -> LabelColor {
        let (background, foreground) = match self {
            Self::Safety => ("#fce4ec", "#c62828"),
            Self::StreetLight => ("#fff3e0", "#e65100"),
            Self::Road => ("#e8eaf6", "#283593"),
            Self::MirrorSign => ("#f3e5f5", "#6a1b9a"),
            Self::Park => ("#e8f5e9", "#2e7d32"),
            Self::Garbage => ("#efebe9", "#4e342e"),
            Self::Other => ("#f5f5f5", "#616161"),
        };
        LabelColor {
            background,
            foreground,
        }
    }

    pub fn from_label(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.label() == name)
    }
}

pub fn label_color(name: &str) -> LabelColor {
    Category::from_label(name)
        .map(Category::color)
        .unwrap_or(DEFAULT_LABEL_COLOR)
}

/// `YYYY/MM/DD` in the local calendar.
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y/%m/%d")
        .to_string()
}

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### .+").expect("valid heading pattern"));
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));

/// Plain-text preview of an issue body with issue-form scaffolding removed.
pub fn extract_preview(body: Option<&str>, limit: usize) -> String {
    let body = match body {
        Some(body) => body,
        None => return String::new(),
    };
    let cleaned = HEADING.replace_all(body, "");
    let cleaned = HTML_COMMENT.replace_all(&cleaned, "");
    let cleaned = cleaned.replace("_No response_", "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= limit {
        return cleaned.to_string();
    }
    let mut preview = cleaned.chars().take(limit).collect::<String>();
    preview.push_str(ELLIPSIS);
    preview
}

/// Escapes text for insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn status_text(state: IssueState) -> &'static str {
    match state {
        IssueState::Open => "対応待ち",
        IssueState::Closed => "対応済み",
    }
}
