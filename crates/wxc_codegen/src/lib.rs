//! Printer for transformed modules.
//!
//! Renders a module through `swc_ecma_codegen`, optionally keeping the
//! comments collected by the parser and producing a source map.

use swc_common::{
    comments::{Comments, SingleThreadedComments},
    source_map::DefaultSourceMapGenConfig,
    sync::Lrc,
    SourceMap,
};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use thiserror::Error;

/// An error that occurred while printing a module.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("printer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to serialize source map: {0}")]
    SourceMap(String),
}

/// Printed source and, if requested, its source map as JSON.
pub struct Printed {
    pub code: String,
    pub source_map: Option<String>,
}

/// Print `module` to source text.
pub fn print_module(
    module: &Module,
    source_map: &Lrc<SourceMap>,
    comments: Option<&SingleThreadedComments>,
) -> Result<String, PrintError> {
    Ok(emit(module, source_map, comments, false)?.code)
}

/// Print `module` and build a source map pointing back at the parsed input.
pub fn print_module_with_source_map(
    module: &Module,
    source_map: &Lrc<SourceMap>,
    comments: Option<&SingleThreadedComments>,
) -> Result<Printed, PrintError> {
    emit(module, source_map, comments, true)
}

fn emit(
    module: &Module,
    source_map: &Lrc<SourceMap>,
    comments: Option<&SingleThreadedComments>,
    with_source_map: bool,
) -> Result<Printed, PrintError> {
    let mut buf = Vec::new();
    let mut srcmap_buf = if with_source_map { Some(vec![]) } else { None };
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, srcmap_buf.as_mut());
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(EsVersion::latest()),
            cm: source_map.clone(),
            comments: comments.map(|c| c as &dyn Comments),
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }

    let code = String::from_utf8(buf)?;

    let source_map = match srcmap_buf {
        Some(srcmap_data) => {
            let srcmap = source_map.build_source_map(&srcmap_data, None, DefaultSourceMapGenConfig);
            let mut srcmap_json = vec![];
            srcmap
                .to_writer(&mut srcmap_json)
                .map_err(|e| PrintError::SourceMap(e.to_string()))?;
            Some(String::from_utf8(srcmap_json)?)
        }
        None => None,
    };

    Ok(Printed { code, source_map })
}
