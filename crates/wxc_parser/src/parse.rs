use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};

use crate::ParseError;

/// Result of parsing a source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Select the parser syntax from the file extension.
///
/// `.ts`/`.mts`/`.cts` and `.tsx` parse as TypeScript, `.jsx` as JavaScript
/// with JSX, anything else as plain JavaScript.
pub fn syntax_for_file(filename: &str) -> Syntax {
    if filename.ends_with(".tsx") {
        Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        })
    } else if filename.ends_with(".ts")
        || filename.ends_with(".mts")
        || filename.ends_with(".cts")
    {
        Syntax::Typescript(TsSyntax {
            decorators: true,
            dts: filename.ends_with(".d.ts"),
            ..Default::default()
        })
    } else if filename.ends_with(".jsx") {
        Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax::default())
    }
}

/// Parse a TypeScript/JavaScript source string as an ES module.
pub fn parse_source(source: &str, filename: &str) -> Result<ParseResult, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax_for_file(filename),
        EsVersion::latest(),
        Some(&comments),
        &mut vec![],
    )
    .map_err(|e| {
        let loc = source_map.lookup_char_pos(e.span().lo);
        ParseError::Syntax {
            filename: filename.to_string(),
            line: loc.line,
            column: loc.col.0 + 1,
            message: e.kind().msg().into_owned(),
        }
    })?;

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}
