//! Translates source documentation comments into GDScript `#` comments.

use swc_common::comments::{Comment, CommentKind, Comments};
use swc_common::BytePos;

use crate::context::ParseContext;

/// GDScript comment lines for the comments leading the token at `pos`.
pub fn leading_comment_lines(ctx: ParseContext<'_>, pos: BytePos) -> Vec<String> {
    let Some(comments) = ctx.comments else {
        return Vec::new();
    };
    let Some(list) = comments.get_leading(pos) else {
        return Vec::new();
    };

    let indent = ctx.indent_str();
    let mut lines = Vec::new();
    for comment in &list {
        translate(comment, &indent, &mut lines);
    }
    lines
}

fn translate(comment: &Comment, indent: &str, out: &mut Vec<String>) {
    match comment.kind {
        CommentKind::Line => {
            let text = comment.text.trim();
            if text.is_empty() {
                out.push(format!("{indent}#"));
            } else {
                out.push(format!("{indent}# {text}"));
            }
        }
        CommentKind::Block => {
            // JSDoc bodies keep a leading `*` per line; strip the frame.
            for raw in comment.text.lines() {
                let line = raw.trim().trim_start_matches('*').trim();
                if !line.is_empty() {
                    out.push(format!("{indent}# {line}"));
                }
            }
        }
    }
}
