//! Patch-flag bookkeeping for Vue compiled render functions.
//!
//! Once a static prop value is replaced by a call, the vnode must be told the
//! prop is dynamic: bit `PROPS` in the patch flag (4th argument) and the prop
//! name in the dynamic props array (5th argument).

use std::ops::Range;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{Expr, ExprOrSpread, Lit};

use crate::core::patch::Edit;
use crate::utils::{Quote, js_string};

const VNODE_CONSTRUCTORS: &[&str] = &[
    "_createVNode",
    "_createElementVNode",
    "_createBlock",
    "_createElementBlock",
];

pub(super) const TEXT_VNODE: &str = "_createTextVNode";

pub(super) const TEXT_FLAG: i64 = 1;
pub(super) const PROPS_FLAG: i64 = 8;

pub(super) fn is_vnode_constructor(name: &str) -> bool {
    VNODE_CONSTRUCTORS.contains(&name)
}

/// Edits that mark `props` as dynamic on a vnode constructor call with
/// arguments `args`. Missing arguments are padded with `null`.
pub(super) fn mark_dynamic_props(
    args: &[ExprOrSpread],
    props: &[String],
    quote: Quote,
    base: u32,
) -> Vec<Edit> {
    let all: Vec<&String> = props.iter().collect();
    let mut edits = Vec::new();

    match args.len() {
        0 | 1 => {}
        2 => edits.push(insert(
            span_range(args[1].span(), base).end,
            format!(", null, {}, {}", PROPS_FLAG, name_array(&all, quote)),
        )),
        3 => edits.push(insert(
            span_range(args[2].span(), base).end,
            format!(", {}, {}", PROPS_FLAG, name_array(&all, quote)),
        )),
        n => {
            let flag = &args[3].expr;
            let merged = match &**flag {
                Expr::Lit(Lit::Num(num)) => (num.value as i64) | PROPS_FLAG,
                _ => PROPS_FLAG,
            };
            let flag_range = span_range(flag.span(), base);
            edits.push(Edit {
                range: flag_range.clone(),
                text: merged.to_string(),
            });

            if n == 4 {
                edits.push(insert(
                    flag_range.end,
                    format!(", {}", name_array(&all, quote)),
                ));
            } else {
                edits.extend(extend_dynamic_array(&args[4].expr, &all, quote, base));
            }
        }
    }

    edits
}

fn extend_dynamic_array(
    existing: &Expr,
    names: &[&String],
    quote: Quote,
    base: u32,
) -> Option<Edit> {
    let Expr::Array(current) = existing else {
        return Some(Edit {
            range: span_range(existing.span(), base),
            text: name_array(names, quote),
        });
    };

    let present: Vec<&str> = current
        .elems
        .iter()
        .flatten()
        .filter_map(|elem| match &*elem.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str(),
            _ => None,
        })
        .collect();
    let missing: Vec<&String> = names
        .iter()
        .copied()
        .filter(|name| !present.contains(&name.as_str()))
        .collect();
    if missing.is_empty() {
        return None;
    }

    match current.elems.iter().flatten().last() {
        Some(last) => {
            let text: String = missing
                .iter()
                .map(|name| format!(", {}", js_string(name, quote)))
                .collect();
            Some(insert(span_range(last.span(), base).end, text))
        }
        None => Some(Edit {
            range: span_range(current.span, base),
            text: name_array(&missing, quote),
        }),
    }
}

fn span_range(span: Span, base: u32) -> Range<usize> {
    span.lo.0.saturating_sub(base) as usize..span.hi.0.saturating_sub(base) as usize
}

fn name_array(names: &[&String], quote: Quote) -> String {
    let items: Vec<String> = names.iter().map(|name| js_string(name, quote)).collect();
    format!("[{}]", items.join(", "))
}

fn insert(at: usize, text: String) -> Edit {
    Edit {
        range: at..at,
        text,
    }
}
