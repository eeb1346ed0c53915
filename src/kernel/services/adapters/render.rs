//! Minimal markdown to HTML, enough for a live preview without a parser crate.
//!
//! Block-level: ATX headings, fenced code, bullet lists, paragraphs. Inline
//! text is escaped; `code` spans are the only inline markup recognised.

use crate::kernel::services::ports::Renderer;

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() + markdown.len() / 4);
        let mut paragraph: Vec<&str> = Vec::new();
        let mut in_list = false;
        let mut in_fence = false;

        for line in markdown.lines() {
            if in_fence {
                if line.trim_start().starts_with("```") {
                    out.push_str("</code></pre>\n");
                    in_fence = false;
                } else {
                    escape_into(&mut out, line);
                    out.push('\n');
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.starts_with("```") {
                flush_paragraph(&mut out, &mut paragraph);
                close_list(&mut out, &mut in_list);
                out.push_str("<pre><code>");
                in_fence = true;
                continue;
            }
            if trimmed.is_empty() {
                flush_paragraph(&mut out, &mut paragraph);
                close_list(&mut out, &mut in_list);
                continue;
            }
            if let Some((level, text)) = heading(trimmed) {
                flush_paragraph(&mut out, &mut paragraph);
                close_list(&mut out, &mut in_list);
                out.push_str(&format!("<h{level}>"));
                inline_into(&mut out, text);
                out.push_str(&format!("</h{level}>\n"));
                continue;
            }
            if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                flush_paragraph(&mut out, &mut paragraph);
                if !in_list {
                    out.push_str("<ul>\n");
                    in_list = true;
                }
                out.push_str("<li>");
                inline_into(&mut out, item);
                out.push_str("</li>\n");
                continue;
            }
            close_list(&mut out, &mut in_list);
            paragraph.push(trimmed);
        }

        flush_paragraph(&mut out, &mut paragraph);
        close_list(&mut out, &mut in_list);
        if in_fence {
            out.push_str("</code></pre>\n");
        }
        out
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|text| (level, text.trim()))
}

fn flush_paragraph(out: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    out.push_str("<p>");
    for (i, line) in paragraph.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        inline_into(out, line);
    }
    out.push_str("</p>\n");
    paragraph.clear();
}

fn close_list(out: &mut String, in_list: &mut bool) {
    if *in_list {
        out.push_str("</ul>\n");
        *in_list = false;
    }
}

fn inline_into(out: &mut String, text: &str) {
    // Odd-numbered segments sit between backticks. An unmatched trailing
    // backtick is kept literally.
    let segments: Vec<&str> = text.split('`').collect();
    let closed = segments.len() % 2 == 1;
    for (i, segment) in segments.iter().enumerate() {
        let is_code = i % 2 == 1 && (closed || i + 1 < segments.len());
        if is_code {
            out.push_str("<code>");
            escape_into(out, segment);
            out.push_str("</code>");
        } else {
            if i % 2 == 1 {
                out.push('`');
            }
            escape_into(out, segment);
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
