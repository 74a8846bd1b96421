//! Leading/trailing comment attachment.
//!
//! The parser reports every comment as it is skipped and every node as it
//! is finalized; that interleaved stream is exactly what the attachment
//! heuristic needs. Since nodes here are plain values, attachments live in
//! a side table keyed by node kind and range rather than on the nodes
//! themselves.

use std::cell::RefCell;
use std::rc::Rc;

use esparse_lex::Comment;
use esparse_par::Delegate;
use esparse_util::{SourceLocation, Span, SyntaxError};

use crate::{parse_with_delegate, ParseOptions, Program};

/// Comments attached to one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attachment {
    /// Node kind tag, e.g. `VariableDeclaration`.
    pub kind: String,
    /// The node's byte range; together with `kind` this identifies it.
    pub span: Span,
    /// Comments ending before the node starts that belong to it.
    pub leading: Vec<Comment>,
    /// Comments after the node's end that belong to it.
    pub trailing: Vec<Comment>,
    /// Comments inside an otherwise empty body.
    pub inner: Vec<Comment>,
}

struct CandidateComment {
    comment: Comment,
    start: usize,
}

struct StackEntry {
    attachment_index: usize,
    start: usize,
}

/// Replays the finalize-order stream, deciding which node each comment
/// belongs to.
#[derive(Default)]
pub struct CommentHandler {
    attachments: Vec<Attachment>,
    visited_spans: Vec<Span>,
    stack: Vec<StackEntry>,
    leading: Vec<CandidateComment>,
    trailing: Vec<CandidateComment>,
}

impl CommentHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn has_child_in(&self, span: Span) -> bool {
        self.visited_spans
            .iter()
            .any(|s| s.start >= span.start && s.end <= span.end && *s != span)
    }

    /// Comments sitting inside an empty block become inner comments.
    fn insert_inner_comments(&mut self, attachment_index: usize) {
        let attachment = &self.attachments[attachment_index];
        if attachment.kind != "BlockStatement" || self.has_child_in(attachment.span) {
            return;
        }
        let end = attachment.span.end;

        let mut inner = Vec::new();
        let mut i = self.leading.len();
        while i > 0 {
            i -= 1;
            if end >= self.leading[i].start {
                inner.insert(0, self.leading.remove(i).comment);
            }
        }
        self.attachments[attachment_index].inner = inner;
    }

    fn find_trailing_comments(&mut self, span: Span) -> Vec<Comment> {
        if !self.trailing.is_empty() {
            let mut trailing = Vec::new();
            let mut i = self.trailing.len();
            while i > 0 {
                i -= 1;
                if self.trailing[i].start >= span.end {
                    trailing.insert(0, self.trailing[i].comment.clone());
                }
            }
            self.trailing.clear();
            return trailing;
        }

        // An enclosing node may have claimed trailing comments that really
        // belong after this one.
        if let Some(last) = self.stack.last() {
            let entry_index = last.attachment_index;
            let reclaim = self.attachments[entry_index]
                .trailing
                .first()
                .map_or(false, |first| first.span.start >= span.end);
            if reclaim {
                return std::mem::take(&mut self.attachments[entry_index].trailing);
            }
        }

        Vec::new()
    }

    fn find_leading_comments(&mut self, span: Span) -> Vec<Comment> {
        let mut target: Option<usize> = None;
        while let Some(last) = self.stack.last() {
            if last.start >= span.start {
                target = Some(last.attachment_index);
                self.stack.pop();
            } else {
                break;
            }
        }

        if let Some(target) = target {
            // Inherit from the innermost child that starts where we do.
            let mut leading = Vec::new();
            let mut i = self.attachments[target].leading.len();
            while i > 0 {
                i -= 1;
                if self.attachments[target].leading[i].span.end <= span.start {
                    leading.insert(0, self.attachments[target].leading.remove(i));
                }
            }
            return leading;
        }

        let mut leading = Vec::new();
        let mut i = self.leading.len();
        while i > 0 {
            i -= 1;
            if self.leading[i].start <= span.start {
                leading.insert(0, self.leading.remove(i).comment);
            }
        }
        leading
    }

    fn visit_node(&mut self, kind: &'static str, span: Span) {
        // The program node would swallow everything left over.
        if kind == "Program" && self.has_child_in(span) {
            return;
        }

        let attachment_index = self.attachments.len();
        self.attachments.push(Attachment {
            kind: kind.to_string(),
            span,
            ..Attachment::default()
        });

        self.insert_inner_comments(attachment_index);
        let trailing = self.find_trailing_comments(span);
        let leading = self.find_leading_comments(span);
        self.attachments[attachment_index].leading = leading;
        self.attachments[attachment_index].trailing = trailing;

        self.visited_spans.push(span);
        self.stack.push(StackEntry {
            attachment_index,
            start: span.start,
        });
    }

    fn visit_comment(&mut self, comment: &Comment) {
        let entry = CandidateComment {
            comment: comment.clone(),
            start: comment.span.start,
        };
        self.leading.push(CandidateComment {
            comment: comment.clone(),
            start: comment.span.start,
        });
        self.trailing.push(entry);
    }

    /// Attachments that ended up with at least one comment.
    pub fn take_attachments(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.attachments)
            .into_iter()
            .filter(|a| {
                !a.leading.is_empty() || !a.trailing.is_empty() || !a.inner.is_empty()
            })
            .collect()
    }
}

struct SharedHandler(Rc<RefCell<CommentHandler>>);

impl Delegate for SharedHandler {
    fn on_node(&mut self, kind: &'static str, span: Span, _loc: &SourceLocation) {
        self.0.borrow_mut().visit_node(kind, span);
    }

    fn on_comment(&mut self, comment: &Comment) {
        self.0.borrow_mut().visit_comment(comment);
    }
}

/// Parses with comment collection on and computes comment attachment.
///
/// Returns the program plus the side table of attachments; a node's
/// attachments are found by its kind and range.
pub fn attach_comments(
    source: &str,
    options: &ParseOptions,
) -> Result<(Program, Vec<Attachment>), SyntaxError> {
    let handler = Rc::new(RefCell::new(CommentHandler::new()));

    let mut options = options.clone();
    options.comment = true;
    options.attach_comment = true;

    let program =
        parse_with_delegate(source, &options, Box::new(SharedHandler(handler.clone())))?;
    let attachments = handler.borrow_mut().take_attachments();
    Ok((program, attachments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment_for<'a>(attachments: &'a [Attachment], kind: &str) -> &'a Attachment {
        attachments
            .iter()
            .find(|a| a.kind == kind)
            .unwrap_or_else(|| panic!("no attachment for {}", kind))
    }

    #[test]
    fn test_leading_comment() {
        let (_, attachments) =
            attach_comments("// the answer\nvar x = 42;", &ParseOptions::default()).unwrap();
        let attachment = attachment_for(&attachments, "VariableDeclaration");
        assert_eq!(attachment.leading.len(), 1);
        assert_eq!(attachment.leading[0].value, " the answer");
    }

    #[test]
    fn test_trailing_comment() {
        let (_, attachments) =
            attach_comments("var x = 42; // the answer\n", &ParseOptions::default()).unwrap();
        let has_trailing = attachments
            .iter()
            .any(|a| a.trailing.iter().any(|c| c.value == " the answer"));
        assert!(has_trailing);
    }

    #[test]
    fn test_inner_comment_in_empty_block() {
        let (_, attachments) =
            attach_comments("function f() { /* empty */ }", &ParseOptions::default()).unwrap();
        let attachment = attachment_for(&attachments, "BlockStatement");
        assert_eq!(attachment.inner.len(), 1);
        assert_eq!(attachment.inner[0].value, " empty ");
    }

    #[test]
    fn test_comment_between_statements_leads_the_second() {
        let (_, attachments) = attach_comments(
            "var a = 1;\n// about b\nvar b = 2;",
            &ParseOptions::default(),
        )
        .unwrap();
        let leaders: Vec<_> = attachments
            .iter()
            .filter(|a| a.leading.iter().any(|c| c.value == " about b"))
            .collect();
        assert!(!leaders.is_empty());
        assert!(leaders.iter().any(|a| a.span.start == 11 + 11));
    }

    #[test]
    fn test_no_comments_no_attachments() {
        let (_, attachments) = attach_comments("var x = 1;", &ParseOptions::default()).unwrap();
        assert!(attachments.is_empty());
    }
}
