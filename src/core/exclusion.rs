//! Positions and call contexts whose literals are never extracted.

use std::collections::HashSet;

/// Calls whose literal arguments are left alone.
pub const DEFAULT_EXCLUDED_CALLS: &[&str] = &[
    "$deepScan",
    "console.log",
    "console.info",
    "console.warn",
    "console.error",
    "$i8n",
    "$t",
    "require",
    "$$i8n",
    "$$t",
    "$emit",
    "$emits",
    "emits",
    "_createCommentVNode",
    "import",
];

/// Vue directives that carry control flow or bindings rather than display text.
pub const STRUCTURAL_DIRECTIVES: &[&str] =
    &["model", "slot", "if", "show", "for", "on", "once", "memo"];

/// Where a candidate literal sits relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralPosition {
    /// Source or specifier of an import/export declaration.
    ModuleSpecifier,
    /// Key of an object property.
    PropertyKey,
    /// Name of a method or class member.
    MemberName,
    /// Any value position.
    Value,
}

#[derive(Debug, Clone)]
pub struct ExclusionResolver {
    calls: HashSet<String>,
    translate_key: String,
}

impl ExclusionResolver {
    /// Build the resolver from the configured extra call names and the
    /// translation function name.
    pub fn new<I, S>(extra_calls: I, translate_key: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut calls: HashSet<String> = DEFAULT_EXCLUDED_CALLS
            .iter()
            .map(|name| name.to_string())
            .collect();
        calls.extend(extra_calls.into_iter().map(Into::into));
        calls.insert(translate_key.to_string());
        Self {
            calls,
            translate_key: translate_key.to_string(),
        }
    }

    /// Apply the exclusion rules in order.
    ///
    /// `enclosing_call` is the resolved name of the nearest call expression
    /// around the literal, if any.
    pub fn is_excluded(&self, position: LiteralPosition, enclosing_call: Option<&str>) -> bool {
        match position {
            LiteralPosition::ModuleSpecifier
            | LiteralPosition::PropertyKey
            | LiteralPosition::MemberName => true,
            LiteralPosition::Value => enclosing_call.is_some_and(|name| self.is_excluded_call(name)),
        }
    }

    /// A call is excluded when its full dotted name or its terminal member
    /// is in the exclusion set.
    pub fn is_excluded_call(&self, name: &str) -> bool {
        self.calls.contains(name) || self.calls.contains(terminal_segment(name))
    }

    /// Whether `name` (a resolved callee path) invokes the translation function.
    pub fn is_translation_call(&self, name: &str) -> bool {
        if self.translate_key.contains('.') {
            name == self.translate_key
        } else {
            terminal_segment(name) == self.translate_key
        }
    }

    pub fn translate_key(&self) -> &str {
        &self.translate_key
    }
}

/// `this.$emit` -> `$emit`.
pub fn terminal_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

pub fn is_structural_directive(name: &str) -> bool {
    STRUCTURAL_DIRECTIVES.contains(&name)
}
