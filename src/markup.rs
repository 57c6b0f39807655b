// ABOUTME: Markup generation for a single slide
// ABOUTME: Converts slide markdown to HTML and swaps @@@ code fences for highlighted blocks

use crate::config::DEFAULT_LEXER;
use crate::errors::{Result, SlidedownError};
use crate::highlight::Highlight;
use comrak::{ComrakOptions, markdown_to_html};
use kuchikikiki::NodeRef;
use kuchikikiki::parse_html;
use log::debug;
use regex::Regex;
use std::cell::OnceCell;
use std::sync::LazyLock;
use tendril::TendrilSink;

static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:<p>)?@@@(?:</p>)?$").unwrap());

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:<p>)?@@@\s*([\w+]+)(?:</p>)?$").unwrap());

/// Convert one slide's markdown to an HTML fragment.
pub fn generate(markdown: &str, highlighter: &dyn Highlight) -> Result<String> {
    MarkupGenerator::new(markdown, highlighter).to_html()
}

/// Markdown with every `@@@` fence pulled out into an empty placeholder div.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fences {
    /// Markdown safe to hand to comrak
    pub markup: String,
    /// Verbatim fence bodies, indexed by the placeholder's `data-fence`
    pub bodies: Vec<String>,
}

/// Replace each `@@@lexer` ... `@@@` fence with
/// `<div class="code" rel="lexer" data-fence="N"></div>`.
///
/// Bodies are kept out of the markdown so comrak never sees them: blank lines,
/// `#`, `*` and `_` inside code stay untouched. A fence left open at the end
/// of the slide is closed there. A stray closing line becomes `</div>`.
pub fn extract_fences(markdown: &str) -> Fences {
    let mut markup = String::with_capacity(markdown.len());
    let mut bodies = Vec::new();
    let mut open: Option<(String, String)> = None;

    for line in markdown.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);

        if open.is_some() {
            if FENCE_CLOSE.is_match(bare) {
                if let Some((lexer, body)) = open.take() {
                    push_placeholder(&mut markup, &lexer, bodies.len());
                    bodies.push(body);
                }
            } else if let Some((_, body)) = open.as_mut() {
                body.push_str(line);
            }
        } else if let Some(captures) = FENCE_OPEN.captures(bare) {
            open = Some((captures[1].to_string(), String::new()));
        } else if FENCE_CLOSE.is_match(bare) {
            markup.push_str("</div>");
            markup.push_str(&line[bare.len()..]);
        } else {
            markup.push_str(line);
        }
    }

    if let Some((lexer, body)) = open {
        debug!("Unterminated {} fence closed at end of slide", lexer);
        push_placeholder(&mut markup, &lexer, bodies.len());
        bodies.push(body);
    }

    Fences { markup, bodies }
}

fn push_placeholder(markup: &mut String, lexer: &str, index: usize) {
    if !markup.is_empty() && !markup.ends_with('\n') {
        markup.push('\n');
    }
    // The trailing blank line ends the HTML block so following text stays markdown
    markup.push_str(&format!(
        "<div class=\"code\" rel=\"{}\" data-fence=\"{}\"></div>\n\n",
        lexer, index
    ));
}

/// One-shot generator; the parsed document is built lazily and never reused.
pub struct MarkupGenerator<'a> {
    fences: Fences,
    highlighter: &'a dyn Highlight,
    document: OnceCell<NodeRef>,
}

impl<'a> MarkupGenerator<'a> {
    pub fn new(markdown: &str, highlighter: &'a dyn Highlight) -> Self {
        Self {
            fences: extract_fences(markdown),
            highlighter,
            document: OnceCell::new(),
        }
    }

    /// Highlight every code block and serialize the children of `<body>`.
    pub fn to_html(&self) -> Result<String> {
        self.highlight()?;

        let body = self
            .document()
            .select_first("body")
            .map_err(|()| SlidedownError::HtmlError("parsed slide has no body".to_string()))?;

        Ok(body
            .as_node()
            .children()
            .map(|child| child.to_string())
            .collect())
    }

    fn markup(&self) -> String {
        // Raw HTML must survive so the fence divs reach the DOM
        let mut options = ComrakOptions::default();
        options.render.unsafe_ = true;
        markdown_to_html(&self.fences.markup, &options)
    }

    fn document(&self) -> &NodeRef {
        self.document
            .get_or_init(|| parse_html().one(self.markup()))
    }

    fn highlight(&self) -> Result<()> {
        // Collect first; replacing while iterating would disturb the traversal
        let code_blocks: Vec<NodeRef> = self
            .document()
            .select("div.code")
            .map_err(|()| SlidedownError::HtmlError("invalid code block selector".to_string()))?
            .map(|div| div.as_node().clone())
            .collect();

        for div in code_blocks {
            let (lexer, fence) = match div.as_element() {
                Some(element) => {
                    let attributes = element.attributes.borrow();
                    let rel = attributes.get("rel").map(str::to_string);
                    let index = attributes
                        .get("data-fence")
                        .and_then(|index| index.parse::<usize>().ok());
                    (rel, index)
                }
                None => (None, None),
            };
            let lexer = lexer.unwrap_or_else(|| DEFAULT_LEXER.to_string());

            // Hand-written div.code blocks carry their code as element text
            let code = match fence.and_then(|index| self.fences.bodies.get(index)) {
                Some(body) => body.clone(),
                None => div.text_contents(),
            };

            debug!("Highlighting {} code block ({} bytes)", lexer, code.len());
            let highlighted = self.highlighter.highlight(&code, &lexer)?;
            let replacement = highlighted_block(&highlighted, &lexer)?;

            div.insert_after(replacement);
            div.detach();
        }

        Ok(())
    }
}


/// Parse highlighter output and return its top-level div with merged classes.
fn highlighted_block(html: &str, lexer: &str) -> Result<NodeRef> {
    let fragment = parse_html().one(html);
    let div = fragment.select_first("div").map_err(|()| {
        SlidedownError::HtmlError(format!(
            "highlighter output for {} has no <div>: {}",
            lexer, html
        ))
    })?;

    {
        let mut attributes = div.attributes.borrow_mut();
        let mut classes: Vec<String> = attributes
            .get("class")
            .map(|class| class.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        for extra in [lexer, "code", "highlight"] {
            if !classes.iter().any(|class| class == extra) {
                classes.push(extra.to_string());
            }
        }
        attributes.insert("class", classes.join(" "));
    }

    Ok(div.as_node().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fences() {
        let fences = extract_fences("intro\n@@@ruby\nputs 1\n@@@\noutro\n");
        assert_eq!(
            fences.markup,
            "intro\n<div class=\"code\" rel=\"ruby\" data-fence=\"0\"></div>\n\noutro\n"
        );
        assert_eq!(fences.bodies, vec!["puts 1\n".to_string()]);
    }

    #[test]
    fn test_extract_fences_paragraph_wrapped_and_spaced() {
        let fences = extract_fences("<p>@@@ c++</p>\nint x;\n<p>@@@</p>");
        assert_eq!(
            fences.markup,
            "<div class=\"code\" rel=\"c++\" data-fence=\"0\"></div>\n\n"
        );
        assert_eq!(fences.bodies, vec!["int x;\n".to_string()]);
    }

    #[test]
    fn test_extract_fences_keeps_body_verbatim() {
        let fences = extract_fences("@@@python\r\nx = 1\r\n\r\n# *y*\r\n@@@\r\n@@@sh\necho hi\n@@@\n");
        assert_eq!(
            fences.bodies,
            vec!["x = 1\r\n\r\n# *y*\r\n".to_string(), "echo hi\n".to_string()]
        );
        assert!(fences.markup.contains("rel=\"sh\" data-fence=\"1\""));
        assert!(!fences.markup.contains("# *y*"));
    }

    #[test]
    fn test_extract_fences_closes_unterminated_fence() {
        let fences = extract_fences("@@@ruby\nputs 1\n");
        assert_eq!(fences.bodies, vec!["puts 1\n".to_string()]);
        assert!(fences.markup.starts_with("<div class=\"code\" rel=\"ruby\""));
    }

    #[test]
    fn test_extract_fences_ignores_inline_at_signs() {
        let text = "email me @@@ruby please\n";
        let fences = extract_fences(text);
        assert_eq!(fences.markup, text);
        assert!(fences.bodies.is_empty());
    }

    #[test]
    fn test_highlighted_block_merges_classes() {
        let node = highlighted_block(r#"<div class="highlight syntax"><pre>x</pre></div>"#, "ruby")
            .expect("highlighted block");
        assert_eq!(
            node.to_string(),
            r#"<div class="highlight syntax ruby code"><pre>x</pre></div>"#
        );
    }

    #[test]
    fn test_highlighted_block_without_div_is_error() {
        let err = highlighted_block("<span>nope</span>", "ruby").unwrap_err();
        assert!(matches!(err, SlidedownError::HtmlError(_)));
    }
}
