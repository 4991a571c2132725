// SPDX-License-Identifier: MIT OR Apache-2.0

//! Brace-delimited block extraction for nginx text.
//!
//! This is pattern scanning, not a tokenizer. A block starts where a header regex
//! (ending in `{`) matches and ends at the brace that brings the nesting depth back
//! to zero. Braces inside quoted strings or regular expressions are not understood.
//! Only the nginx adapter uses this module, so a real tokenizer can replace it
//! without touching anything else.

use regex::Regex;

/// One matched block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Capture groups of the header regex, in order, trimmed
    pub args: Vec<String>,
    /// Text between the opening and the matching closing brace
    pub body: &'a str,
}

impl Block<'_> {
    /// First header capture, or an empty string.
    pub fn arg(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// Finds every block whose header matches `header`.
///
/// Matching resumes after the end of each block, so a header nested inside an
/// already matched block of the same kind is not reported separately. An unclosed
/// block extends to the end of the input.
pub fn find_blocks<'a>(content: &'a str, header: &Regex) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < content.len() {
        let Some(caps) = header.captures_at(content, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        let body_start = whole.end();
        let (body_end, next) = match matching_brace(content, body_start) {
            Some(close) => (close, close + 1),
            None => (content.len(), content.len()),
        };

        let args = caps
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().trim().to_string()).unwrap_or_default())
            .collect();

        blocks.push(Block {
            args,
            body: &content[body_start..body_end],
        });
        pos = next;
    }

    blocks
}

/// Byte offset of the `}` closing a block whose body starts at `start`.
fn matching_brace(content: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte) in content.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Removes `#` comments that start a line or follow whitespace.
pub fn strip_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut prev_is_space = true;
            for (i, c) in line.char_indices() {
                if c == '#' && prev_is_space {
                    return &line[..i];
                }
                prev_is_space = c.is_whitespace();
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether `{` and `}` are balanced across the whole text.
pub fn braces_balanced(content: &str) -> bool {
    let mut depth: i64 = 0;
    for c in content.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_header() -> Regex {
        Regex::new(r"\bserver\s*\{").unwrap()
    }

    #[test]
    fn test_nested_blocks_are_kept_whole() {
        let text = "server { location / { if ($x) { return 403; } proxy_pass http://a; } }";
        let blocks = find_blocks(text, &server_header());
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].body.contains("proxy_pass http://a;"));
        assert!(blocks[0].body.trim_end().ends_with('}'));
    }

    #[test]
    fn test_sibling_blocks() {
        let text = "server { listen 80; }\nserver { listen 81; }";
        let blocks = find_blocks(text, &server_header());
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].body.contains("81"));
    }

    #[test]
    fn test_header_captures() {
        let header = Regex::new(r"\bupstream\s+([\w.-]+)\s*\{").unwrap();
        let blocks = find_blocks("upstream api { server a; }", &header);
        assert_eq!(blocks[0].arg(), "api");
        assert_eq!(blocks[0].body.trim(), "server a;");
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let blocks = find_blocks("server { listen 80;", &server_header());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body.trim(), "listen 80;");
    }

    #[test]
    fn test_server_directive_is_not_a_block() {
        let text = "upstream api { server 10.0.0.1:80; }";
        assert!(find_blocks(text, &server_header()).is_empty());
    }

    #[test]
    fn test_strip_comments() {
        let text = "# header { \nlisten 80; # plain\nreturn 301 https://$host#frag;";
        let stripped = strip_comments(text);
        assert!(!stripped.contains("header"));
        assert!(!stripped.contains("plain"));
        assert!(stripped.contains("$host#frag"));
    }

    #[test]
    fn test_braces_balanced() {
        assert!(braces_balanced("a { b { } }"));
        assert!(!braces_balanced("a { b { }"));
        assert!(!braces_balanced("} {"));
    }
}
