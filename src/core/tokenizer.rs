//! Lenient markup tokenizer
//!
//! Single left-to-right pass over raw text that extracts markup tokens with
//! their exact byte spans:
//! - open / close / self-closing tags
//! - comments, CDATA sections
//! - processing instructions (including the XML declaration)
//! - DOCTYPE declarations
//!
//! Everything between tokens is text. The tokenizer never validates
//! well-formedness: a stray `<` that does not begin a recognizable token is
//! skipped as text, and a truncated token simply ends the stream. This is
//! what lets the path resolver work on malformed or cut-off documents.

use super::scanner::Scanner;

/// Type of markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening tag: `<name ...>` or self-closing `<name .../>`
    Open,
    /// Closing tag: `</name>`
    Close,
    /// Comment: `<!--...-->`
    Comment,
    /// CDATA section: `<![CDATA[...]]>`
    CData,
    /// Processing instruction: `<?target ...?>` (the XML declaration included)
    ProcessingInstruction,
    /// DOCTYPE or other `<!...>` declaration
    Doctype,
}

/// A markup token with its raw byte span
#[derive(Debug, Clone, Copy)]
pub struct TagToken<'a> {
    pub kind: TokenKind,
    /// Raw span in input, `[start, end)`, delimiters included
    pub span: (usize, usize),
    /// Tag name for Open/Close tokens, PI target for PIs
    pub name: Option<&'a str>,
    /// True for `<name .../>`
    pub self_closing: bool,
}

impl<'a> TagToken<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        TagToken {
            kind,
            span,
            name: None,
            self_closing: false,
        }
    }

    /// Byte span of the attribute region of an Open token
    /// (between the tag name and the closing delimiter)
    pub fn attr_span(&self) -> (usize, usize) {
        let name_len = self.name.map_or(0, str::len);
        let start = self.span.0 + 1 + name_len;
        let end = self.span.1 - if self.self_closing { 2 } else { 1 };
        (start, end.max(start))
    }
}

/// Pull-style tokenizer over raw markup
pub struct Tokenizer<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input.as_bytes()),
        }
    }

    /// Get the next markup token, or None at end of input
    pub fn next_token(&mut self) -> Option<TagToken<'a>> {
        loop {
            let start = self.scanner.find_tag_start()?;
            self.scanner.set_position(start);

            if self.scanner.starts_with(b"<!--") {
                return self.terminated_token(TokenKind::Comment, start, 4, b"-->");
            }
            if self.scanner.starts_with(b"<![CDATA[") {
                return self.terminated_token(TokenKind::CData, start, 9, b"]]>");
            }
            if self.scanner.starts_with(b"<?") {
                return self.terminated_token(TokenKind::ProcessingInstruction, start, 2, b"?>");
            }
            if self.scanner.starts_with(b"<!") {
                self.scanner.advance(2);
                let end = match self.scanner.find_byte(b'>') {
                    Some(gt) => gt + 1,
                    None => return self.truncated(),
                };
                self.scanner.set_position(end);
                return Some(TagToken::new(TokenKind::Doctype, (start, end)));
            }
            if self.scanner.starts_with(b"</") {
                self.scanner.advance(2);
                let name = match self.scanner.read_name() {
                    Some(name) => name,
                    None => {
                        // "</" with no name: not a token, skip past '<'
                        self.scanner.set_position(start + 1);
                        continue;
                    }
                };
                let end = match self.scanner.find_byte(b'>') {
                    Some(gt) => gt + 1,
                    None => return self.truncated(),
                };
                self.scanner.set_position(end);
                let mut token = TagToken::new(TokenKind::Close, (start, end));
                token.name = Some(self.name_str(name, start + 2));
                return Some(token);
            }

            // Plain tag: '<' followed by a name
            self.scanner.advance(1);
            let name = match self.scanner.read_name() {
                Some(name) => name,
                None => {
                    // Stray '<' in text, skip it
                    self.scanner.set_position(start + 1);
                    continue;
                }
            };
            let gt = match self.scanner.find_tag_end_quoted() {
                Some(gt) => gt,
                None => return self.truncated(),
            };
            let end = gt + 1;
            self.scanner.set_position(end);
            let mut token = TagToken::new(TokenKind::Open, (start, end));
            token.name = Some(self.name_str(name, start + 1));
            token.self_closing = gt > start && self.input.as_bytes()[gt - 1] == b'/';
            return Some(token);
        }
    }

    /// Emit a token whose body runs to a fixed terminator sequence
    fn terminated_token(
        &mut self,
        kind: TokenKind,
        start: usize,
        prefix_len: usize,
        terminator: &[u8],
    ) -> Option<TagToken<'a>> {
        self.scanner.set_position(start + prefix_len);
        let end = match self.scanner.find_seq(terminator) {
            Some(t) => t + terminator.len(),
            None => return self.truncated(),
        };
        self.scanner.set_position(end);
        Some(TagToken::new(kind, (start, end)))
    }

    /// Truncated token at end of input: stop the stream
    fn truncated(&mut self) -> Option<TagToken<'a>> {
        self.scanner.set_position(self.input.len());
        None
    }

    /// Re-slice a name from the input so the lifetime is tied to it
    fn name_str(&self, name: &[u8], start: usize) -> &'a str {
        &self.input[start..start + name.len()]
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = TagToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<TagToken<'_>> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_open_close_spans() {
        let toks = tokens("<a>text</a>");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, TokenKind::Open);
        assert_eq!(toks[0].span, (0, 3));
        assert_eq!(toks[0].name, Some("a"));
        assert_eq!(toks[1].kind, TokenKind::Close);
        assert_eq!(toks[1].span, (7, 11));
        assert_eq!(toks[1].name, Some("a"));
    }

    #[test]
    fn test_self_closing() {
        let toks = tokens("<br/><hr />");
        assert!(toks.iter().all(|t| t.self_closing));
        assert_eq!(toks[1].name, Some("hr"));
    }

    #[test]
    fn test_comment_cdata_pi() {
        let toks = tokens("<?xml version=\"1.0\"?><!-- c --><r><![CDATA[<x>]]></r>");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ProcessingInstruction,
                TokenKind::Comment,
                TokenKind::Open,
                TokenKind::CData,
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn test_namespaced_name() {
        let toks = tokens("<ns:Foo.bar-baz/>");
        assert_eq!(toks[0].name, Some("ns:Foo.bar-baz"));
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let toks = tokens("<a>1 < 2</a>");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].kind, TokenKind::Close);
    }

    #[test]
    fn test_truncated_tag_ends_stream() {
        let toks = tokens("<a><b attr=\"1");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].name, Some("a"));
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let toks = tokens("<a attr=\">\">x</a>");
        assert_eq!(toks[0].span, (0, 12));
        assert!(!toks[0].self_closing);
    }

    #[test]
    fn test_attr_span() {
        let toks = tokens("<a b=\"1\"/>");
        let (s, e) = toks[0].attr_span();
        assert_eq!(&"<a b=\"1\"/>"[s..e], " b=\"1\"");
    }
}
