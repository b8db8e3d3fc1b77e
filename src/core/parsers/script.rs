use std::path::Path;
use std::sync::Arc;

use swc_common::{BytePos, FileName, GLOBALS, Globals, SourceMap, Spanned};
use swc_ecma_ast::{Expr, Module};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// A parsed module together with the offset of its first byte in swc's
/// global position space. `span.lo.0 - base` is a byte offset into the code.
#[derive(Debug)]
pub struct ParsedScript {
    pub module: Module,
    pub base: u32,
}

#[derive(Debug)]
pub struct ParsedExpr {
    pub expr: Box<Expr>,
    pub base: u32,
}

/// A parse failure with its byte offset into the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseError {
    pub offset: usize,
    pub message: String,
}

impl std::fmt::Display for ScriptParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScriptParseError {}

/// Script flavour, chosen from a file extension or a `<script lang>` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLang {
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl ScriptLang {
    pub fn from_lang_attr(lang: Option<&str>) -> Self {
        match lang.map(str::to_ascii_lowercase).as_deref() {
            Some("ts") => ScriptLang::Ts,
            Some("tsx") => ScriptLang::Tsx,
            Some("jsx") => ScriptLang::Jsx,
            _ => ScriptLang::Js,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::from_lang_attr(ext)
    }

    fn syntax(self) -> Syntax {
        match self {
            ScriptLang::Ts | ScriptLang::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == ScriptLang::Tsx,
                decorators: true,
                ..Default::default()
            }),
            ScriptLang::Js | ScriptLang::Jsx => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// Parse a whole script into a module.
pub fn parse_script(
    code: &str,
    file_path: &str,
    lang: ScriptLang,
) -> Result<ParsedScript, ScriptParseError> {
    let source_map: Arc<SourceMap> = Default::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(
            FileName::Real(file_path.into()).into(),
            code.to_string(),
        );
        let base = source_file.start_pos.0;

        let mut parser = Parser::new(lang.syntax(), StringInput::from(&*source_file), None);
        let module = parser.parse_module().map_err(|e| ScriptParseError {
            offset: offset_of(e.span().lo, base),
            message: e.kind().msg().to_string(),
        })?;

        Ok(ParsedScript { module, base })
    })
}

/// Parse a standalone expression, as found in template interpolations and
/// directive values. The whole input must be consumed.
pub fn parse_expression(code: &str) -> Result<ParsedExpr, ScriptParseError> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Anon.into(), code.to_string());
        let base = source_file.start_pos.0;

        let syntax = Syntax::Typescript(TsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        let expr = parser.parse_expr().map_err(|e| ScriptParseError {
            offset: offset_of(e.span().lo, base),
            message: e.kind().msg().to_string(),
        })?;

        let end = offset_of(expr.span().hi, base);
        if end < code.trim_end().len() {
            return Err(ScriptParseError {
                offset: end,
                message: "Unexpected trailing input after expression".to_string(),
            });
        }

        Ok(ParsedExpr { expr, base })
    })
}

fn offset_of(pos: BytePos, base: u32) -> usize {
    pos.0.saturating_sub(base) as usize
}
