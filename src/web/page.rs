//! HTML rendering for the single upload page.

use crate::intake::UploadedImage;
use crate::llm::models::AnalysisResult;

pub const PAGE_TITLE: &str = "Wall Defect Detection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Redisplay data for an uploaded image.
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl From<&UploadedImage> for ImagePreview {
    fn from(image: &UploadedImage) -> Self {
        Self {
            data_url: image.data_url(),
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Everything one render of the page needs.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub prompt: String,
    pub image: Option<ImagePreview>,
    pub notices: Vec<Notice>,
    pub analysis: Option<String>,
}

impl PageView {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Success text becomes the analysis body; blocked and empty become warnings; transport
    /// failures become errors.
    pub fn with_result(mut self, result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Success { text } => self.analysis = Some(text.clone()),
            AnalysisResult::Blocked { .. } | AnalysisResult::Empty => {
                if let Some(message) = result.message() {
                    self.notices.push(Notice::warning(message));
                }
            }
            AnalysisResult::TransportError { .. } => {
                if let Some(message) = result.message() {
                    self.notices.push(Notice::error(message));
                }
            }
        }
        self
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Paragraphs on blank lines, line breaks kept inside paragraphs.
pub fn format_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape_html).collect();
            format!("<p>{}</p>", lines.join("<br>\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; display: flex; min-height: 100vh; color: #222; }
aside { width: 320px; background: #f0f2f6; padding: 24px; box-sizing: border-box; }
main { flex: 1; padding: 24px 40px; }
figure { margin: 16px 0; }
figure img { max-width: 100%; border-radius: 6px; }
figcaption { color: #666; font-size: 0.85em; }
textarea { width: 100%; min-height: 120px; box-sizing: border-box; }
.notice { padding: 12px 16px; border-radius: 6px; margin: 12px 0; }
.notice.info { background: #e8f0fe; color: #1a4fa0; }
.notice.warning { background: #fff8e1; color: #8a6d00; }
.notice.error { background: #fdecea; color: #a12622; }
.analysis p { line-height: 1.6; }
"#;

pub fn render(view: &PageView) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", PAGE_TITLE));
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str("<aside>\n<h2>Select an image</h2>\n");
    html.push_str(
        "<form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">\n\
         <label for=\"image\">Upload an image...</label>\n\
         <input type=\"file\" id=\"image\" name=\"image\" accept=\".jpg,.jpeg,.png\">\n\
         <label for=\"prompt\">Prompt</label>\n",
    );
    html.push_str(&format!(
        "<textarea id=\"prompt\" name=\"prompt\">{}</textarea>\n",
        escape_html(&view.prompt)
    ));
    html.push_str("<button type=\"submit\">Analyze</button>\n</form>\n");

    if let Some(image) = &view.image {
        html.push_str(&format!(
            "<figure class=\"upload\">\n<img src=\"{}\" alt=\"Uploaded Image\">\n\
             <figcaption>Uploaded Image ({}&times;{})</figcaption>\n</figure>\n",
            image.data_url, image.width, image.height
        ));
    }
    html.push_str("</aside>\n<main>\n");

    html.push_str(&format!("<h1>{}</h1>\n", PAGE_TITLE));
    for notice in &view.notices {
        html.push_str(&format!(
            "<div class=\"notice {}\">{}</div>\n",
            notice.level.css_class(),
            escape_html(&notice.message)
        ));
    }
    if let Some(text) = &view.analysis {
        html.push_str(&format!(
            "<section class=\"analysis\">\n<h2>Analysis</h2>\n{}\n</section>\n",
            format_text(text)
        ));
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}
