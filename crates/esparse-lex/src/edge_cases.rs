//! Edge case tests for esparse-lex

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::Scanner;

    /// Drives the scanner to completion, collecting token spans.
    fn scan_spans(source: &str) -> Result<Vec<(usize, usize)>, ()> {
        let mut scanner = Scanner::new(source, false);
        let mut spans = Vec::new();
        // Each round consumes at least one byte or ends the scan, so this
        // is bounded by the source length.
        for _ in 0..=source.len() + 1 {
            if scanner.scan_comments().is_err() {
                return Err(());
            }
            match scanner.lex() {
                Ok(token) => {
                    if token.kind == TokenKind::Eof {
                        return Ok(spans);
                    }
                    spans.push((token.start, token.end));
                }
                Err(_) => return Err(()),
            }
        }
        panic!("scanner failed to make progress");
    }

    // ==================== EDGE CASES ====================

    /// EDGE CASE: Empty source
    #[test]
    fn test_edge_empty_source() {
        assert_eq!(scan_spans("").unwrap(), vec![]);
    }

    /// EDGE CASE: Whitespace only
    #[test]
    fn test_edge_whitespace_only() {
        assert_eq!(scan_spans("  \t\n\u{00A0}  ").unwrap(), vec![]);
    }

    /// EDGE CASE: BOM-like formatting character is whitespace
    #[test]
    fn test_edge_zwnbsp_is_whitespace() {
        assert_eq!(scan_spans("\u{FEFF}x").unwrap().len(), 1);
    }

    /// EDGE CASE: Token spans tile the significant source
    #[test]
    fn test_edge_spans_ordered_and_in_bounds() {
        let source = "var x = /re/g + `t${y}`;";
        let spans = scan_spans(source).unwrap_or_default();
        for window in spans.windows(2) {
            assert!(window[0].1 <= window[1].0);
        }
        for (start, end) in spans {
            assert!(start < end && end <= source.len());
        }
    }

    /// EDGE CASE: Lone illegal characters error, never panic
    #[test]
    fn test_edge_illegal_characters() {
        for source in ["#", "@", "€", "\\", "\u{0000}"] {
            assert!(scan_spans(source).is_err(), "{:?} should fail", source);
        }
    }

    /// EDGE CASE: Deeply nested template substitutions keep the curly
    /// stack balanced
    #[test]
    fn test_edge_nested_templates() {
        let source = "`a${ `b${ `c` }` }`";
        assert!(scan_spans(source).is_ok());
    }

    /// EDGE CASE: Keyword-prefixed identifiers stay identifiers
    #[test]
    fn test_edge_keyword_prefix() {
        let mut scanner = Scanner::new("varx instanceofx", false);
        scanner.scan_comments().unwrap();
        assert_eq!(scanner.lex().unwrap().kind, TokenKind::Identifier);
        scanner.scan_comments().unwrap();
        assert_eq!(scanner.lex().unwrap().kind, TokenKind::Identifier);
    }

    mod properties {
        use super::scan_spans;
        use proptest::prelude::*;

        proptest! {
            /// Scanning arbitrary input terminates, and every token it does
            /// produce has an ordered, in-bounds range.
            #[test]
            fn scan_never_panics(source in "[ -~\\n\\t]{0,80}") {
                if let Ok(spans) = scan_spans(&source) {
                    for (start, end) in spans {
                        prop_assert!(start < end);
                        prop_assert!(end <= source.len());
                    }
                }
            }

            /// Valid identifier-shaped input scans as one token covering
            /// the whole source.
            #[test]
            fn identifiers_scan_whole(source in "[a-zA-Z_$][a-zA-Z0-9_$]{0,20}") {
                let spans = scan_spans(&source).unwrap();
                prop_assert_eq!(spans, vec![(0, source.len())]);
            }

            /// Decimal literals round-trip through the scanner.
            #[test]
            fn numbers_scan_whole(value in 0u64..1_000_000u64) {
                let source = value.to_string();
                let spans = scan_spans(&source).unwrap();
                prop_assert_eq!(spans.len(), 1);
            }
        }
    }
}
