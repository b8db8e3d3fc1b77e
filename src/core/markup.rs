//! Vue single-file component adapter.
//!
//! Script blocks go through the script rewriter; the template is tokenized
//! and its text, interpolations and attributes are spliced in place.

use std::ops::Range;

use tracing::warn;

use super::aggregate::I18nMap;
use super::engine::{Engine, script_parse_issue};
use super::exclusion::is_structural_directive;
use super::parsers::script::ScriptLang;
use super::parsers::sfc::{SfcBlock, SfcError, parse_sfc};
use super::parsers::template::{Attribute, TemplateNode, tokenize};
use super::patch::Patcher;
use super::rewrite::{SourceKind, TranslatableUnit, rewrite_expression, rewrite_script_block};
use crate::issues::Issue;
use crate::utils::{Quote, collapse_whitespace, decode_entities, js_string, trimmed_range};

#[derive(Default)]
pub struct MarkupRewrite {
    pub patcher: Patcher,
    pub map: I18nMap,
    pub units: Vec<TranslatableUnit>,
    pub issues: Vec<Issue>,
}

pub fn rewrite_sfc(
    engine: &Engine,
    source: &str,
    file_path: &str,
) -> Result<MarkupRewrite, SfcError> {
    let descriptor = parse_sfc(source)?;
    let mut out = MarkupRewrite::default();

    // `<script setup>` first.
    let mut scripts: Vec<&SfcBlock> = descriptor.scripts.iter().collect();
    scripts.sort_by_key(|block| !block.setup);

    let mut import_injected = false;
    for block in scripts {
        let lang = ScriptLang::from_lang_attr(block.lang);
        match rewrite_script_block(engine, block.content, file_path, lang, !import_injected) {
            Ok(result) => {
                import_injected |= !result.map.is_empty();
                out.patcher.absorb(result.patcher, block.offset);
                out.map.extend(result.map);
                out.units.extend(result.units);
                out.issues
                    .extend(result.conflicts.into_iter().map(Issue::ImportConflict));
            }
            Err(err) => {
                warn!(file = file_path, "script block: {}", err);
                out.issues
                    .push(script_parse_issue(file_path, source, &err, block.offset));
            }
        }
    }

    if let Some(template) = &descriptor.template {
        if template
            .lang
            .is_none_or(|lang| lang.eq_ignore_ascii_case("html"))
        {
            TemplateRewriter {
                engine,
                file_path,
                out: &mut out,
            }
            .run(template);
        } else {
            warn!(file = file_path, lang = ?template.lang, "template language not supported");
        }
    }

    Ok(out)
}

struct TemplateRewriter<'a> {
    engine: &'a Engine,
    file_path: &'a str,
    out: &'a mut MarkupRewrite,
}

impl TemplateRewriter<'_> {
    fn run(&mut self, template: &SfcBlock) {
        for node in tokenize(template.content, template.offset) {
            match node {
                TemplateNode::Text { text, range } => self.text(text, range),
                TemplateNode::Interpolation { expr, range, .. } => self.interpolation(expr, range),
                TemplateNode::Attribute(attr) => self.attribute(&attr),
            }
        }
    }

    /// Rewrite `code` as an expression; `Some(new code)` when it changed.
    fn expression(&mut self, code: &str, quote: Quote, kind: SourceKind) -> Option<String> {
        let result = match rewrite_expression(self.engine, code, quote) {
            Ok(result) => result,
            Err(err) => {
                warn!(file = self.file_path, "skipping template expression {:?}: {}", code, err);
                return None;
            }
        };
        if result.patcher.is_empty() {
            self.out.map.extend(result.map);
            return None;
        }

        let rewritten = result.patcher.apply(code);
        self.out.map.extend(result.map);
        self.out
            .units
            .extend(result.units.into_iter().map(|unit| TranslatableUnit {
                source_kind: relabel(unit.source_kind, kind),
                ..unit
            }));
        (rewritten != code).then_some(rewritten)
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        if !self.engine.options().extract_from_text {
            return;
        }
        let collapsed = decode_entities(&collapse_whitespace(text)).into_owned();
        if !self.engine.should_extract(&collapsed) {
            return;
        }
        let Some(trimmed) = trimmed_range(text) else {
            return;
        };
        let literal = js_string(&collapsed, Quote::Single);
        if let Some(call) = self.expression(&literal, Quote::Single, SourceKind::MarkupText) {
            self.out.patcher.replace(
                range.start + trimmed.start..range.start + trimmed.end,
                format!("{{{{ {} }}}}", call),
            );
        }
    }

    fn interpolation(&mut self, expr: &str, range: Range<usize>) {
        let code = expr.replace(['\r', '\n'], " ");
        let code = code.trim();
        if code.is_empty() {
            return;
        }
        if let Some(rewritten) =
            self.expression(code, Quote::Single, SourceKind::MarkupInterpolation)
        {
            self.out
                .patcher
                .replace(range, format!("{{{{ {} }}}}", rewritten));
        }
    }

    fn attribute(&mut self, attr: &Attribute) {
        let Some(value) = &attr.value else {
            return;
        };

        let Some(directive) = Directive::parse(attr.name) else {
            if !self.engine.options().extract_from_text {
                return;
            }
            let text = value.text.trim();
            if !self.engine.should_extract(text) {
                return;
            }
            let literal = js_string(text, Quote::Single);
            if let Some(call) =
                self.expression(&literal, Quote::Single, SourceKind::MarkupAttribute)
            {
                self.out
                    .patcher
                    .replace(attr.range.clone(), format!(":{}=\"{}\"", attr.name, call));
            }
            return;
        };

        if is_structural_directive(directive.name)
            || (directive.name == "bind" && directive.arg == Some("key"))
        {
            return;
        }
        let code = value.text.trim();
        if code.is_empty() {
            return;
        }

        // Generated literals use the quote the attribute value does not.
        let quote = match value.quote {
            Some('\'') => Quote::Double,
            _ => Quote::Single,
        };
        let Some(rewritten) = self.expression(code, quote, SourceKind::MarkupAttribute) else {
            return;
        };
        if value.quote.is_some() {
            let start = value.range.start + (value.text.len() - value.text.trim_start().len());
            self.out
                .patcher
                .replace(start..start + code.len(), rewritten);
        } else {
            self.out
                .patcher
                .replace(value.range.clone(), format!("\"{}\"", rewritten));
        }
    }
}

/// String literals found inside markup are reported by where they sat.
fn relabel(kind: SourceKind, markup: SourceKind) -> SourceKind {
    match kind {
        SourceKind::StringLiteral => markup,
        other => other,
    }
}

/// A Vue directive attribute: `v-name:arg.modifier` and its shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Directive<'a> {
    name: &'a str,
    arg: Option<&'a str>,
}

impl<'a> Directive<'a> {
    fn parse(attr_name: &'a str) -> Option<Self> {
        let (name, rest) = if let Some(rest) = attr_name.strip_prefix(':') {
            ("bind", Some(rest))
        } else if let Some(rest) = attr_name.strip_prefix('.') {
            ("bind", Some(rest))
        } else if let Some(rest) = attr_name.strip_prefix('@') {
            ("on", Some(rest))
        } else if let Some(rest) = attr_name.strip_prefix('#') {
            ("slot", Some(rest))
        } else {
            let body = attr_name.strip_prefix("v-")?;
            let name_end = body.find([':', '.']).unwrap_or(body.len());
            let rest = body[name_end..].strip_prefix(':');
            (&body[..name_end], rest)
        };

        let arg = rest
            .map(|rest| rest.split('.').next().unwrap_or(rest))
            .filter(|arg| !arg.is_empty());
        Some(Self { name, arg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionOptions;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine {
        Engine::new(ExtractionOptions {
            rewrite: true,
            ..Default::default()
        })
        .unwrap()
    }

    fn rewrite(source: &str) -> (String, MarkupRewrite) {
        let result = rewrite_sfc(&engine(), source, "App.vue").unwrap();
        (result.patcher.apply(source), result)
    }

    #[test]
    fn directive_parsing() {
        let parse = |name| Directive::parse(name).unwrap();
        assert_eq!(parse(":title"), Directive { name: "bind", arg: Some("title") });
        assert_eq!(parse("v-bind:key"), Directive { name: "bind", arg: Some("key") });
        assert_eq!(parse("@click.stop"), Directive { name: "on", arg: Some("click") });
        assert_eq!(parse("v-if"), Directive { name: "if", arg: None });
        assert_eq!(parse("v-html"), Directive { name: "html", arg: None });
        assert_eq!(parse("#default"), Directive { name: "slot", arg: Some("default") });
        assert_eq!(parse("v-model.trim"), Directive { name: "model", arg: None });
        assert!(Directive::parse("title").is_none());
    }

    #[test]
    fn template_text() {
        let (output, result) = rewrite("<template>\n  <p>\n    你好\n    世界\n  </p>\n</template>");
        assert_eq!(
            output,
            "<template>\n  <p>\n    {{ $t('h0x3ry') }}\n  </p>\n</template>"
        );
        assert_eq!(result.map.get("h0x3ry").map(String::as_str), Some("你好 世界"));
        assert_eq!(result.units[0].source_kind, SourceKind::MarkupText);
    }

    #[test]
    fn template_text_entities_are_decoded() {
        let (output, result) = rewrite("<template><p>&lt;你好&gt;</p></template>");
        let text = "<你好>";
        let key = crate::core::key::generate_id(text, ExtractionOptions::default().key_length);
        assert_eq!(result.map.get(&key).map(String::as_str), Some(text));
        assert_eq!(output, format!("<template><p>{{{{ $t('{}') }}}}</p></template>", key));
    }

    #[test]
    fn template_interpolation() {
        let (output, result) =
            rewrite("<template><p>{{ ok ? '确定' : '取消' }} {{ name }}</p></template>");
        assert_eq!(
            output,
            "<template><p>{{ ok ? $t('03mfu9') : $t('03qmvv') }} {{ name }}</p></template>"
        );
        assert!(
            result
                .units
                .iter()
                .all(|unit| unit.source_kind == SourceKind::MarkupInterpolation)
        );
    }

    #[test]
    fn multiline_interpolation_is_collapsed() {
        let (output, _) = rewrite("<template><p>{{\n  '你好'\n}}</p></template>");
        assert_eq!(output, "<template><p>{{ $t('03tpnc') }}</p></template>");
    }

    #[test]
    fn static_attribute_becomes_binding() {
        let (output, _) = rewrite(r#"<template><input placeholder="请输入" type="text"></template>"#);
        assert_eq!(
            output,
            r#"<template><input :placeholder="$t('2nyd6s')" type="text"></template>"#
        );
    }

    #[test]
    fn bound_attribute_rewritten_in_place() {
        let (output, _) = rewrite(
            r#"<template><a :title="ok ? '标题' : ''" v-html="'提示'"></a></template>"#,
        );
        assert_eq!(
            output,
            r#"<template><a :title="ok ? $t('03o396') : ''" v-html="$t('03nub3')"></a></template>"#
        );
    }

    #[test]
    fn single_quoted_attribute_uses_double_quotes() {
        let (output, _) = rewrite(r#"<template><a :title='"标题"'></a></template>"#);
        assert_eq!(output, r#"<template><a :title='$t("03o396")'></a></template>"#);
    }

    #[test]
    fn structural_directives_and_key_are_skipped() {
        let source = r#"<template><li v-for="x in ['你好']" :key="'标题'" v-if="a === '提示'" @click="say('你好')">x</li></template>"#;
        let (output, result) = rewrite(source);
        assert_eq!(output, source);
        assert!(result.map.is_empty());
    }

    #[test]
    fn existing_translation_calls_in_template() {
        let (output, _) = rewrite(r#"<template><p :title="$t('标题')">{{ $t('你好') }}</p></template>"#);
        assert_eq!(
            output,
            r#"<template><p :title="$t('03o396')">{{ $t('03tpnc') }}</p></template>"#
        );
    }

    #[test]
    fn script_and_template_together() {
        let source = r#"<template>
  <h1>{{ title }}</h1>
  <button>保存</button>
</template>

<script setup lang="ts">
const title: string = "标题";
</script>
"#;
        let (output, result) = rewrite(source);
        assert_eq!(
            output,
            r#"<template>
  <h1>{{ title }}</h1>
  <button>{{ $t('03tr8g') }}</button>
</template>

<script setup lang="ts">
import { $t } from "@/i18n";
const title: string = $t("03o396");
</script>
"#
        );
        assert_eq!(result.map.len(), 2);
    }

    #[test]
    fn import_injected_once_across_script_blocks() {
        let source = "<script>\nexport default { name: \"标题\" }\n</script>\n<script setup>\nconst a = \"你好\"\n</script>";
        let (output, _) = rewrite(source);
        assert_eq!(output.matches("import { $t }").count(), 1);
        assert!(output.contains("<script setup>\nimport { $t } from \"@/i18n\";\nconst a = $t(\"03tpnc\")"));
    }

    #[test]
    fn script_parse_error_is_reported_with_file_position() {
        let source = "<template><p>你好</p></template>\n<script>\nconst = 1;\n</script>";
        let (output, result) = rewrite(source);
        assert_eq!(output, "<template><p>{{ $t('03tpnc') }}</p></template>\n<script>\nconst = 1;\n</script>");
        let [Issue::ParseError(issue)] = result.issues.as_slice() else {
            panic!("expected a parse error, got {:?}", result.issues);
        };
        assert_eq!(issue.line, 3);
    }

    #[test]
    fn bad_template_expression_is_skipped() {
        let source = "<template><p>{{ a + }}</p><p>你好</p></template>";
        let (output, _) = rewrite(source);
        assert_eq!(output, "<template><p>{{ a + }}</p><p>{{ $t('03tpnc') }}</p></template>");
    }

    #[test]
    fn non_html_template_is_left_alone() {
        let source = "<template lang=\"pug\">\np 你好\n</template>";
        let (output, result) = rewrite(source);
        assert_eq!(output, source);
        assert!(result.map.is_empty());
    }
}
