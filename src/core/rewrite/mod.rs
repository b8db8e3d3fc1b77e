//! Script extraction and rewriting.
//!
//! A single immutable pass over the swc AST decides, per literal, whether it
//! is translatable text and records a span edit replacing it with a
//! translation call. Nothing in the tree is mutated, so a replaced node can
//! never be visited again.

mod import;
mod vnode;

use std::ops::Range;

use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, CallExpr, Callee, Class, ExportAll, Expr, ExprOrSpread, Function, ImportDecl,
    JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementName, JSXExpr,
    JSXOpeningElement, JSXText, Lit, MemberExpr, MemberProp, NamedExport, NewExpr, ObjectLit,
    OptCall, OptChainBase, Prop, PropName, PropOrSpread, Str, TaggedTpl, Tpl, TplElement,
    TsEnumDecl, TsImportEqualsDecl, TsModuleDecl, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, warn};

use super::aggregate::I18nMap;
use super::engine::Engine;
use super::exclusion::{LiteralPosition, terminal_segment};
use super::parsers::script::{ScriptLang, ScriptParseError, parse_expression, parse_script};
use super::patch::Patcher;
use crate::issues::ImportConflictIssue;
use crate::utils::{Quote, collapse_whitespace, decode_entities, js_string, trimmed_range};

/// Which syntactic surface a piece of text was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    StringLiteral,
    TemplateSegment,
    MarkupText,
    MarkupInterpolation,
    MarkupAttribute,
    TranslationCallArgument,
    JsxText,
    WrapperElement,
}

/// A located piece of text the rewriter made a decision about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableUnit {
    pub raw_text: String,
    pub source_kind: SourceKind,
    /// Contains substitutions, so it was left untouched.
    pub is_dynamic: bool,
}

pub struct ScriptRewrite {
    pub patcher: Patcher,
    pub map: I18nMap,
    pub units: Vec<TranslatableUnit>,
    pub conflicts: Vec<ImportConflictIssue>,
}

pub struct ExprRewrite {
    pub patcher: Patcher,
    pub map: I18nMap,
    pub units: Vec<TranslatableUnit>,
}

/// Rewrite a whole script file, injecting the translation import when needed.
pub fn rewrite_script(
    engine: &Engine,
    code: &str,
    file_path: &str,
    lang: ScriptLang,
) -> Result<ScriptRewrite, ScriptParseError> {
    rewrite_script_block(engine, code, file_path, lang, true)
}

/// Rewrite one script. `inject_import` lets callers with several blocks
/// sharing a module scope (Vue `<script>` + `<script setup>`) inject once.
pub fn rewrite_script_block(
    engine: &Engine,
    code: &str,
    file_path: &str,
    lang: ScriptLang,
    inject_import: bool,
) -> Result<ScriptRewrite, ScriptParseError> {
    let parsed = parse_script(code, file_path, lang)?;
    let mut rewriter = ScriptRewriter::new(engine, code, parsed.base, Quote::Double);
    parsed.module.visit_with(&mut rewriter);

    let ScriptRewriter {
        mut patcher,
        map,
        units,
        uses_wrapper,
        ..
    } = rewriter;

    let options = engine.options();
    let mut conflicts = Vec::new();
    if inject_import && options.rewrite && options.auto_import_i18n && !map.is_empty() {
        let mut names = vec![options.translate_key.as_str()];
        if uses_wrapper {
            names.push(options.jsx_element.as_str());
        }
        match import::plan_import(
            &parsed.module,
            code,
            parsed.base,
            &names,
            &options.i18n_pkg_import_path,
        ) {
            Ok(Some(edit)) => patcher.replace(edit.range, edit.text),
            Ok(None) => {}
            Err(conflict) => {
                warn!(
                    file = file_path,
                    name = %conflict.name,
                    "import not injected, name is already bound ({})",
                    conflict.binding
                );
                conflicts.push(ImportConflictIssue {
                    file_path: file_path.to_string(),
                    name: conflict.name,
                    binding: conflict.binding,
                });
            }
        }
    }

    Ok(ScriptRewrite {
        patcher,
        map,
        units,
        conflicts,
    })
}

/// Rewrite a standalone expression, as found in markup. Generated literals
/// use `quote`.
pub fn rewrite_expression(
    engine: &Engine,
    code: &str,
    quote: Quote,
) -> Result<ExprRewrite, ScriptParseError> {
    let parsed = parse_expression(code)?;
    let mut rewriter = ScriptRewriter::new(engine, code, parsed.base, quote);
    parsed.expr.visit_with(&mut rewriter);
    Ok(ExprRewrite {
        patcher: rewriter.patcher,
        map: rewriter.map,
        units: rewriter.units,
    })
}

/// Where a replaced string literal sits, which decides the replacement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Plain,
    /// `title="..."` on a JSX element, needs `{}`.
    JsxAttr,
    /// Value in a compiled vnode props object.
    VNodeProp,
    /// First argument of `_createTextVNode`.
    TextVNode { sole: bool },
}

struct ScriptRewriter<'a> {
    engine: &'a Engine,
    code: &'a str,
    base: u32,
    quote: Quote,
    patcher: Patcher,
    map: I18nMap,
    units: Vec<TranslatableUnit>,
    /// Resolved names of the enclosing calls, innermost last. Function
    /// boundaries push `None`.
    calls: Vec<Option<String>>,
    uses_wrapper: bool,
}

impl<'a> ScriptRewriter<'a> {
    fn new(engine: &'a Engine, code: &'a str, base: u32, quote: Quote) -> Self {
        Self {
            engine,
            code,
            base,
            quote,
            patcher: Patcher::new(),
            map: I18nMap::new(),
            units: Vec::new(),
            calls: Vec::new(),
            uses_wrapper: false,
        }
    }

    fn range(&self, span: Span) -> Range<usize> {
        span.lo.0.saturating_sub(self.base) as usize..span.hi.0.saturating_sub(self.base) as usize
    }

    fn current_call(&self) -> Option<&str> {
        self.calls.last().and_then(|call| call.as_deref())
    }

    fn excluded(&self, position: LiteralPosition) -> bool {
        self.engine
            .exclusion()
            .is_excluded(position, self.current_call())
    }

    fn with_frame(&mut self, call: Option<String>, f: impl FnOnce(&mut Self)) {
        self.calls.push(call);
        f(self);
        self.calls.pop();
    }

    fn register(&mut self, text: &str, kind: SourceKind) -> String {
        let key = self.engine.key_for(text);
        debug!(key = %key, kind = ?kind, "extracted {:?}", text);
        self.map.insert(key.clone(), text.to_string());
        self.units.push(TranslatableUnit {
            raw_text: text.to_string(),
            source_kind: kind,
            is_dynamic: false,
        });
        key
    }

    /// `$t("key")`, or `_ctx.$t("key")` inside compiled render code.
    fn call_expr(&self, key: &str, text: &str, quote: Quote, in_render: bool) -> String {
        let options = self.engine.options();
        let mut args = js_string(key, quote);
        if options.keep_default_msg {
            args.push_str(", ");
            args.push_str(&js_string(text, quote));
        }
        if in_render {
            format!("_ctx.{}({})", options.translate_key, args)
        } else {
            format!("{}({})", options.translate_key, args)
        }
    }

    fn replacement(&self, key: &str, text: &str, slot: Slot) -> String {
        match slot {
            Slot::Plain => self.call_expr(key, text, self.quote, false),
            Slot::JsxAttr => format!("{{{}}}", self.call_expr(key, text, self.quote, false)),
            Slot::VNodeProp | Slot::TextVNode { sole: false } => {
                self.call_expr(key, text, self.quote, true)
            }
            Slot::TextVNode { sole: true } => {
                format!(
                    "{}, {}",
                    self.call_expr(key, text, self.quote, true),
                    vnode::TEXT_FLAG
                )
            }
        }
    }

    /// Handle a string literal value. Returns whether it was replaced.
    fn string_literal(&mut self, span: Span, value: &str, slot: Slot) -> bool {
        if !self.engine.options().extract_from_text || self.excluded(LiteralPosition::Value) {
            return false;
        }
        let text = value.trim();
        if !self.engine.should_extract(text) {
            return false;
        }
        let key = self.register(text, SourceKind::StringLiteral);
        let replacement = self.replacement(&key, text, slot);
        self.patcher.replace(self.range(span), replacement);
        true
    }

    fn template_segment(&mut self, quasi: &TplElement) {
        let Some(cooked) = quasi.cooked.as_ref().and_then(|c| c.as_str()) else {
            return;
        };
        let text = cooked.trim();
        if !self.engine.should_extract(text) {
            return;
        }
        let range = self.range(quasi.span);
        let raw: &str = &quasi.raw;
        if self.code.get(range.clone()) != Some(raw) {
            debug!(?range, "template chunk span does not match its raw text");
            return;
        }
        let Some(trimmed) = raw_trimmed_range(raw, cooked) else {
            debug!(?range, "template chunk edges do not map onto its raw text");
            return;
        };
        let key = self.register(text, SourceKind::TemplateSegment);
        let call = self.call_expr(&key, text, Quote::Single, false);
        self.patcher.replace(
            range.start + trimmed.start..range.start + trimmed.end,
            format!("${{{}}}", call),
        );
    }

    /// First argument of a translation call. Returns whether the argument
    /// was consumed here.
    fn translation_argument(&mut self, expr: &Expr, arg_count: usize) -> bool {
        let (span, text) = match expr {
            Expr::Lit(Lit::Str(s)) => (s.span, s.value.as_str()),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => (
                tpl.span,
                tpl.quasis
                    .first()
                    .and_then(|quasi| quasi.cooked.as_ref())
                    .and_then(|cooked| cooked.as_str()),
            ),
            Expr::Tpl(tpl) => {
                let raw_text = self.code.get(self.range(tpl.span)).unwrap_or_default();
                debug!("dynamic template {} left untouched", raw_text);
                self.units.push(TranslatableUnit {
                    raw_text: raw_text.to_string(),
                    source_kind: SourceKind::TranslationCallArgument,
                    is_dynamic: true,
                });
                return false;
            }
            _ => return false,
        };

        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };

        let engine = self.engine;
        if let Some(source) = engine.known_text(text) {
            self.map.insert(text.to_string(), source.to_string());
            return true;
        }
        if !engine.should_extract(text) {
            return true;
        }

        let key = self.register(text, SourceKind::TranslationCallArgument);
        let mut replacement = js_string(&key, self.quote);
        if engine.options().keep_default_msg && arg_count == 1 {
            replacement.push_str(", ");
            replacement.push_str(&js_string(text, self.quote));
        }
        self.patcher.replace(self.range(span), replacement);
        true
    }

    /// Visit a call-like node: callee first in the outer frame, then the
    /// arguments in a frame named after the callee.
    fn call(&mut self, name: Option<String>, args: &[ExprOrSpread]) {
        let Some(name) = name else {
            self.with_frame(None, |this| visit_args(this, args));
            return;
        };

        if self.engine.exclusion().is_translation_call(&name) {
            let consumed = args.first().is_some_and(|first| {
                first.spread.is_none() && self.translation_argument(&first.expr, args.len())
            });
            let rest = if consumed { &args[1..] } else { args };
            self.with_frame(Some(name), |this| visit_args(this, rest));
            return;
        }

        let callee = terminal_segment(&name);
        if vnode::is_vnode_constructor(callee) {
            let mut dynamic = Vec::new();
            self.with_frame(Some(name.clone()), |this| {
                for (index, arg) in args.iter().enumerate() {
                    match &*arg.expr {
                        Expr::Object(props) if index == 1 => this.vnode_props(props, &mut dynamic),
                        _ => arg.visit_with(this),
                    }
                }
            });
            if !dynamic.is_empty() {
                for edit in vnode::mark_dynamic_props(args, &dynamic, self.quote, self.base) {
                    self.patcher.replace(edit.range, edit.text);
                }
            }
            return;
        }

        if callee == vnode::TEXT_VNODE {
            let sole = args.len() == 1;
            self.with_frame(Some(name.clone()), |this| {
                for (index, arg) in args.iter().enumerate() {
                    match &*arg.expr {
                        Expr::Lit(Lit::Str(s)) if index == 0 => {
                            if let Some(value) = s.value.as_str() {
                                this.string_literal(s.span, value, Slot::TextVNode { sole });
                            }
                        }
                        _ => arg.visit_with(this),
                    }
                }
            });
            return;
        }

        self.with_frame(Some(name), |this| visit_args(this, args));
    }

    fn vnode_props(&mut self, props: &ObjectLit, dynamic: &mut Vec<String>) {
        for prop in &props.props {
            let PropOrSpread::Prop(prop) = prop else {
                prop.visit_with(self);
                continue;
            };
            let Prop::KeyValue(kv) = &**prop else {
                prop.visit_with(self);
                continue;
            };
            match &*kv.value {
                Expr::Lit(Lit::Str(s)) => {
                    if let Some(value) = s.value.as_str()
                        && self.string_literal(s.span, value, Slot::VNodeProp)
                        && let Some(name) = prop_name_text(&kv.key)
                    {
                        dynamic.push(name);
                    }
                }
                value => value.visit_with(self),
            }
        }
    }

    fn is_wrapper(&self, name: &JSXElementName) -> bool {
        matches!(name, JSXElementName::Ident(ident) if ident.sym == *self.engine.options().jsx_element)
    }

    /// `<Trans id="key" />`, with `msg` when default messages are kept.
    fn wrapper_markup(&self, key: &str, text: &str) -> String {
        let options = self.engine.options();
        let mut markup = format!("<{} id={}", options.jsx_element, js_string(key, Quote::Double));
        if options.keep_default_msg {
            markup.push_str(" msg=");
            markup.push_str(&jsx_attr_value(text));
        }
        markup.push_str(" />");
        markup
    }

    /// An authored `<Trans msg="...">`: assign an id, register, strip `msg`.
    fn wrapper_element(&mut self, opening: &JSXOpeningElement) {
        let mut id = None;
        let mut msg = None;
        for attr in &opening.attrs {
            let JSXAttrOrSpread::JSXAttr(attr) = attr else {
                continue;
            };
            match jsx_attr_name(attr) {
                Some("id") => id = static_attr_text(attr),
                Some("msg") => msg = static_attr_text(attr).map(|text| (text, attr.span)),
                _ => {}
            }
        }

        let Some((text, msg_span)) = msg else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let key = match id {
            Some(id) => id,
            None => {
                let key = self.register_wrapper(text);
                let JSXElementName::Ident(name) = &opening.name else {
                    return;
                };
                let at = self.range(name.span).end;
                self.patcher
                    .insert(at, format!(" id={}", js_string(&key, Quote::Double)));
                key
            }
        };
        self.map.insert(key, text.to_string());

        if !self.engine.options().keep_default_msg {
            let range = self.range(msg_span);
            let start = self.code[..range.start].trim_end().len();
            self.patcher.remove(start..range.end);
        }
    }

    fn register_wrapper(&mut self, text: &str) -> String {
        let key = self.engine.key_for(text);
        self.units.push(TranslatableUnit {
            raw_text: text.to_string(),
            source_kind: SourceKind::WrapperElement,
            is_dynamic: false,
        });
        key
    }
}

impl Visit for ScriptRewriter<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        node.callee.visit_with(self);
        let name = match &node.callee {
            Callee::Expr(expr) => expr_path(expr),
            Callee::Import(_) => Some("import".to_string()),
            Callee::Super(_) => None,
        };
        self.call(name, &node.args);
    }

    fn visit_opt_call(&mut self, node: &OptCall) {
        node.callee.visit_with(self);
        self.call(expr_path(&node.callee), &node.args);
    }

    fn visit_new_expr(&mut self, node: &NewExpr) {
        node.callee.visit_with(self);
        if let Some(args) = &node.args {
            self.call(expr_path(&node.callee), args);
        }
    }

    fn visit_function(&mut self, node: &Function) {
        self.with_frame(None, |this| node.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.with_frame(None, |this| node.visit_children_with(this));
    }

    fn visit_class(&mut self, node: &Class) {
        self.with_frame(None, |this| node.visit_children_with(this));
    }

    fn visit_str(&mut self, node: &Str) {
        if let Some(value) = node.value.as_str() {
            self.string_literal(node.span, value, Slot::Plain);
        }
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        node.exprs.visit_with(self);
        if !self.engine.options().extract_from_text || self.excluded(LiteralPosition::Value) {
            return;
        }
        for quasi in &node.quasis {
            self.template_segment(quasi);
        }
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        node.tag.visit_with(self);
        node.tpl.exprs.visit_with(self);
    }

    fn visit_prop_name(&mut self, node: &PropName) {
        if let PropName::Computed(computed) = node
            && !is_static_key(&computed.expr)
        {
            computed.visit_with(self);
        } else if !self.excluded(LiteralPosition::PropertyKey) {
            node.visit_children_with(self);
        }
    }

    fn visit_member_prop(&mut self, node: &MemberProp) {
        if let MemberProp::Computed(computed) = node
            && !is_static_key(&computed.expr)
        {
            computed.visit_with(self);
        } else if !self.excluded(LiteralPosition::MemberName) {
            node.visit_children_with(self);
        }
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        if !self.engine.options().extract_from_text || self.excluded(LiteralPosition::Value) {
            return;
        }
        let range = self.range(node.span);
        let Some(raw) = self.code.get(range.clone()) else {
            return;
        };
        let Some(trimmed) = trimmed_range(raw) else {
            return;
        };
        let text = decode_entities(&collapse_whitespace(raw)).into_owned();
        if !self.engine.should_extract(&text) {
            return;
        }

        let key = self.register(&text, SourceKind::JsxText);
        let replacement = if self.engine.options().jsx {
            self.uses_wrapper = true;
            self.wrapper_markup(&key, &text)
        } else {
            format!("{{{}}}", self.call_expr(&key, &text, self.quote, false))
        };
        self.patcher.replace(
            range.start + trimmed.start..range.start + trimmed.end,
            replacement,
        );
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        match &node.value {
            Some(JSXAttrValue::Str(s)) => {
                if let Some(value) = s.value.as_str() {
                    self.string_literal(s.span, value, Slot::JsxAttr);
                }
            }
            Some(value) => value.visit_with(self),
            None => {}
        }
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if !self.is_wrapper(&node.opening.name) {
            node.visit_children_with(self);
            return;
        }

        self.wrapper_element(&node.opening);
        for attr in &node.opening.attrs {
            let is_wrapper_attr = matches!(
                attr,
                JSXAttrOrSpread::JSXAttr(attr) if matches!(jsx_attr_name(attr), Some("id" | "msg"))
            );
            if !is_wrapper_attr {
                attr.visit_with(self);
            }
        }
        node.children.visit_with(self);
    }

    // Module plumbing and type-level syntax never carry display text.
    fn visit_import_decl(&mut self, _: &ImportDecl) {}
    fn visit_named_export(&mut self, _: &NamedExport) {}
    fn visit_export_all(&mut self, _: &ExportAll) {}
    fn visit_ts_import_equals_decl(&mut self, _: &TsImportEqualsDecl) {}
    fn visit_ts_module_decl(&mut self, _: &TsModuleDecl) {}
    fn visit_ts_enum_decl(&mut self, _: &TsEnumDecl) {}
    fn visit_ts_type(&mut self, _: &TsType) {}
}

fn visit_args<V: Visit>(visitor: &mut V, args: &[ExprOrSpread]) {
    for arg in args {
        arg.visit_with(visitor);
    }
}

/// Dotted path of a callee: `console.log`, `this.$t`, `_ctx.$t`.
fn expr_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Paren(paren) => expr_path(&paren.expr),
        Expr::TsNonNull(e) => expr_path(&e.expr),
        Expr::TsAs(e) => expr_path(&e.expr),
        Expr::Member(member) => member_path(member),
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(member) => member_path(member),
            OptChainBase::Call(_) => None,
        },
        _ => None,
    }
}

fn member_path(member: &MemberExpr) -> Option<String> {
    let prop = match &member.prop {
        MemberProp::Ident(ident) => ident.sym.to_string(),
        MemberProp::PrivateName(private) => format!("#{}", private.name),
        MemberProp::Computed(computed) => match &*computed.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str()?.to_string(),
            _ => return None,
        },
    };
    Some(match expr_path(&member.obj) {
        Some(object) => format!("{}.{}", object, prop),
        None => prop,
    })
}

/// Range of `raw` (a template chunk as written) holding the text that is
/// left once `cooked` is trimmed.
///
/// Whitespace at the edges may be written literally or as a single-character
/// escape (`\n`, `\t`, ...), and both stay outside the range. Returns `None`
/// when the edges cannot be matched one-to-one, e.g. for `\u000A` or a line
/// continuation.
fn raw_trimmed_range(raw: &str, cooked: &str) -> Option<Range<usize>> {
    let leading = cooked.chars().take_while(|c| c.is_whitespace()).count();
    let trailing = cooked.chars().rev().take_while(|c| c.is_whitespace()).count();

    let mut start = 0;
    for _ in 0..leading {
        start += leading_whitespace_len(&raw[start..])?;
    }
    let mut end = raw.len();
    for _ in 0..trailing {
        end -= trailing_whitespace_len(&raw[start..end])?;
    }
    let inner = &raw[start..end];
    let clean_edges =
        leading_whitespace_len(inner).is_none() && trailing_whitespace_len(inner).is_none();
    (start < end && clean_edges).then_some(start..end)
}

const WHITESPACE_ESCAPES: &[char] = &['n', 't', 'r', 'v', 'f'];

fn leading_whitespace_len(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    match chars.next()? {
        '\\' => chars
            .next()
            .filter(|c| WHITESPACE_ESCAPES.contains(c))
            .map(|_| 2),
        c if c.is_whitespace() => Some(c.len_utf8()),
        _ => None,
    }
}

fn trailing_whitespace_len(raw: &str) -> Option<usize> {
    let last = raw.chars().next_back()?;
    if last.is_whitespace() {
        return Some(last.len_utf8());
    }
    if !WHITESPACE_ESCAPES.contains(&last) {
        return None;
    }
    // The escape letter counts only when preceded by an odd run of backslashes.
    let backslashes = raw[..raw.len() - 1]
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count();
    (backslashes % 2 == 1).then_some(2)
}

/// A computed key that is really a constant string: `["a"]` or `` [`a`] ``.
fn is_static_key(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(Lit::Str(_)) => true,
        Expr::Tpl(tpl) => tpl.exprs.is_empty(),
        _ => false,
    }
}

fn prop_name_text(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Num(num) => Some(num.value.to_string()),
        _ => None,
    }
}

fn jsx_attr_name(attr: &JSXAttr) -> Option<&str> {
    match &attr.name {
        JSXAttrName::Ident(ident) => Some(&*ident.sym),
        JSXAttrName::JSXNamespacedName(_) => None,
    }
}

/// Text of `attr="..."` or `attr={"..."}` / ``attr={`...`}``.
fn static_attr_text(attr: &JSXAttr) -> Option<String> {
    match attr.value.as_ref()? {
        JSXAttrValue::Str(s) => s.value.as_str().map(str::to_string),
        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => match &**expr {
                Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
                Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
                    .quasis
                    .first()
                    .and_then(|quasi| quasi.cooked.as_ref())
                    .and_then(|cooked| cooked.as_str())
                    .map(str::to_string),
                _ => None,
            },
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    }
}

/// JSX attribute value for `text`; plain quotes when nothing needs escaping.
fn jsx_attr_value(text: &str) -> String {
    if text.contains(['"', '{', '}', '<', '>', '&', '\n']) {
        format!("{{{}}}", js_string(text, Quote::Double))
    } else {
        format!("\"{}\"", text)
    }
}
