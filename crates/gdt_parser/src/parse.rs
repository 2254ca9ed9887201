use anyhow::Result;
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceMap,
};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{Syntax, TsSyntax};

/// Result of parsing one TypeScript source file.
pub struct ParsedFile {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a TypeScript source string into a module.
///
/// Parser rejections are surfaced verbatim and are fatal for this file only;
/// a multi-file run continues with its remaining files.
pub fn parse_typescript(source: &str, filename: &str) -> Result<ParsedFile> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let handler =
        Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let ts_syntax = Syntax::Typescript(TsSyntax {
        decorators: true,
        ..Default::default()
    });

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        ts_syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut vec![],
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow::anyhow!("failed to parse {filename}")
    })?;

    Ok(ParsedFile {
        module,
        comments,
        source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_class_module() {
        let parsed =
            parse_typescript("export default class extends Node2D {}\n", "test.ts").unwrap();
        assert_eq!(parsed.module.body.len(), 1);
    }

    #[test]
    fn rejects_malformed_source() {
        assert!(parse_typescript("class {", "broken.ts").is_err());
    }
}
