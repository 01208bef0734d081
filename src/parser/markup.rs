use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+(.+)$").unwrap());
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());
static BLOCK_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

const MAX_HEADING_LEVEL: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    ListItem(String),
    Text(String),
}

/// Convert loosely formatted text into an HTML fragment of headings,
/// unordered lists and paragraphs. Content is emitted as-is, without escaping.
pub fn to_html(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }

    let text = markup
        .replace("\\n", "\n")
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut html = String::new();
    for block in BLOCK_SPLIT_RE.split(text.trim()) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        render_block(&classify_lines(block), &mut html);
    }
    html
}

/// Classify every non-blank line of a block independently.
pub fn classify_lines(block: &str) -> Vec<Block> {
    block
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> Block {
    // ── Heading: ## text ──
    if let Some(caps) = HEADING_RE.captures(line) {
        let level = caps[1].len().min(MAX_HEADING_LEVEL) as u8;
        return Block::Heading {
            level,
            text: caps[2].trim().to_string(),
        };
    }

    // ── List item: - text / * text ──
    if let Some(caps) = LIST_RE.captures(line) {
        return Block::ListItem(caps[1].trim().to_string());
    }

    Block::Text(line.to_string())
}

/// Group consecutive list items into one `<ul>` and consecutive text lines
/// into one `<p>`. Headings stand alone and break any run.
fn render_block(blocks: &[Block], html: &mut String) {
    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading { level, text } => {
                html.push_str(&format!("<h{level}>{text}</h{level}>"));
                i += 1;
            }
            Block::ListItem(_) => {
                html.push_str("<ul>");
                while let Some(Block::ListItem(item)) = blocks.get(i) {
                    html.push_str(&format!("<li>{}</li>", item));
                    i += 1;
                }
                html.push_str("</ul>");
            }
            Block::Text(_) => {
                let mut lines = Vec::new();
                while let Some(Block::Text(line)) = blocks.get(i) {
                    lines.push(line.as_str());
                    i += 1;
                }
                html.push_str(&format!("<p>{}</p>", lines.join(" ")));
            }
        }
    }
}
