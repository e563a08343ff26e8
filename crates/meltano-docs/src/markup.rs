//! Markdown conversion for plugin descriptions and setting docs.
//!
//! Hub definitions carry descriptions in CommonMark. Rendered pages are
//! reStructuredText, so templates convert through [`md_to_rst`]; raw HTML
//! embeds (tooltips, `.. raw:: html` blocks) go through [`md_to_html`].

use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Parser, Tag};

/// Convert markdown to reStructuredText. Empty or absent input yields `""`.
pub fn md_to_rst(markdown: Option<&str>) -> String {
    match markdown {
        Some(md) if !md.is_empty() => {
            let mut writer = RstWriter::default();
            for event in Parser::new(md) {
                writer.event(event);
            }
            writer.finish().trim_end().to_string()
        }
        _ => String::new(),
    }
}

/// Convert markdown to HTML. Empty or absent input yields `""`.
pub fn md_to_html(markdown: Option<&str>) -> String {
    match markdown {
        Some(md) if !md.is_empty() => {
            let mut out = String::new();
            html::push_html(&mut out, Parser::new(md));
            out.trim_end().to_string()
        }
        _ => String::new(),
    }
}

#[derive(Debug)]
enum Container {
    Quote,
    Item { width: usize },
}

/// Streaming RST writer over pulldown-cmark events.
///
/// Inline content accumulates in `inline` and is flushed as one block when a
/// block boundary is reached. Blocks are separated by a blank line and
/// indented according to the enclosing list items and quotes.
#[derive(Debug, Default)]
struct RstWriter {
    out: String,
    inline: String,
    containers: Vec<Container>,
    lists: Vec<Option<u64>>,
    links: Vec<String>,
    pending_marker: Option<String>,
    code: Option<String>,
}

impl RstWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => push_escaped(&mut self.inline, &text),
            },
            Event::Code(text) => {
                self.inline.push_str("``");
                self.inline.push_str(&text);
                self.inline.push_str("``");
            }
            Event::Html(text) => self.inline.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.inline.push('\n'),
            Event::Rule => {
                self.flush_inline();
                self.write_block("----");
            }
            Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Heading(..) => self.flush_inline(),
            Tag::BlockQuote => {
                self.flush_inline();
                self.containers.push(Container::Quote);
            }
            Tag::CodeBlock(_) => {
                self.flush_inline();
                self.code = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_inline();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_inline();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.containers.push(Container::Item {
                    width: marker.len(),
                });
                self.pending_marker = Some(marker);
            }
            Tag::Emphasis => self.inline.push('*'),
            Tag::Strong => self.inline.push_str("**"),
            Tag::Link(_, dest, _) | Tag::Image(_, dest, _) => {
                self.inline.push('`');
                self.links.push(dest.to_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.flush_inline(),
            Tag::Heading(level, ..) => {
                let title = std::mem::take(&mut self.inline);
                let title = title.trim();
                if !title.is_empty() {
                    let underline = heading_char(level).to_string().repeat(title.chars().count());
                    self.write_block(&format!("{title}\n{underline}"));
                }
            }
            Tag::BlockQuote => {
                self.flush_inline();
                self.containers.pop();
            }
            Tag::CodeBlock(kind) => {
                let code = self.code.take().unwrap_or_default();
                match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        self.write_block(&format!(".. code-block:: {lang}"));
                    }
                    _ => self.write_block("::"),
                }
                self.containers.push(Container::Quote);
                self.write_block(code.trim_end_matches('\n'));
                self.containers.pop();
            }
            Tag::List(_) => {
                self.flush_inline();
                self.lists.pop();
            }
            Tag::Item => {
                self.flush_inline();
                self.containers.pop();
                self.pending_marker = None;
            }
            Tag::Emphasis => self.inline.push('*'),
            Tag::Strong => self.inline.push_str("**"),
            Tag::Link(..) | Tag::Image(..) => {
                let dest = self.links.pop().unwrap_or_default();
                self.inline.push_str(&format!(" <{dest}>`__"));
            }
            _ => {}
        }
    }

    fn indent(&self) -> String {
        self.containers
            .iter()
            .map(|container| match container {
                Container::Quote => "    ".to_string(),
                Container::Item { width } => " ".repeat(*width),
            })
            .collect()
    }

    fn flush_inline(&mut self) {
        let text = std::mem::take(&mut self.inline);
        let text = text.trim();
        if !text.is_empty() {
            self.write_block(text);
        }
    }

    fn write_block(&mut self, block: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let indent = self.indent();
        let first_prefix = match self.pending_marker.take() {
            Some(marker) => {
                let outer = indent.len().saturating_sub(marker.len());
                format!("{}{marker}", &indent[..outer])
            }
            None => indent.clone(),
        };
        for (i, line) in block.lines().enumerate() {
            if i == 0 {
                self.out.push_str(&first_prefix);
                self.out.push_str(line);
            } else if !line.is_empty() {
                self.out.push_str(&indent);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.flush_inline();
        self.out
    }
}

fn heading_char(level: HeadingLevel) -> char {
    match level {
        HeadingLevel::H1 => '=',
        HeadingLevel::H2 => '-',
        HeadingLevel::H3 => '~',
        HeadingLevel::H4 => '^',
        HeadingLevel::H5 => '"',
        HeadingLevel::H6 => '\'',
    }
}

/// Append plain text, escaping characters that start RST inline markup.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, '*' | '`' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
}
