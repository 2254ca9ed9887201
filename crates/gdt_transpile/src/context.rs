//! Per-file state threaded through every handler invocation.

use gdt_ast::{Diagnostic, Fragment, TranspileConfig};
use swc_common::comments::SingleThreadedComments;
use swc_common::{SourceMap, Span};

/// One level of GDScript indentation.
pub const INDENT: &str = "    ";

/// The state-threading channel passed to every handler.
///
/// Cheap to copy; handlers derive child contexts (e.g. [`indented`]) instead
/// of mutating shared state. This is the extension point for scope-aware
/// facilities such as declared-name tracking.
///
/// [`indented`]: ParseContext::indented
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub file_name: &'a str,
    pub source_map: &'a SourceMap,
    pub comments: Option<&'a SingleThreadedComments>,
    pub config: &'a TranspileConfig,
    /// Current statement indentation depth.
    pub indent: usize,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        file_name: &'a str,
        source_map: &'a SourceMap,
        comments: Option<&'a SingleThreadedComments>,
        config: &'a TranspileConfig,
    ) -> Self {
        ParseContext {
            file_name,
            source_map,
            comments,
            config,
            indent: 0,
        }
    }

    /// Context for statements nested one level deeper.
    pub fn indented(self) -> Self {
        ParseContext {
            indent: self.indent + 1,
            ..self
        }
    }

    pub fn indent_str(&self) -> String {
        INDENT.repeat(self.indent)
    }

    /// 1-based line and column of a span's start.
    pub fn pos(&self, span: Span) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(span.lo);
        (loc.line, loc.col_display + 1)
    }

    /// Build an unsupported-construct report for a node.
    pub fn diagnostic(&self, span: Span, kind: &str, message: &str) -> Diagnostic {
        let (line, col) = self.pos(span);
        Diagnostic {
            file: self.file_name.to_string(),
            line,
            col,
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }

    /// A fragment whose only payload is an unsupported-construct report.
    /// Emitted instead of silently dropping the node; siblings keep going.
    pub fn unsupported(&self, span: Span, kind: &str, message: &str) -> Fragment {
        Fragment::unsupported(self.diagnostic(span, kind, message))
    }
}
