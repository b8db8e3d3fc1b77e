//! Translation-function import injection.

use std::collections::HashMap;

use swc_ecma_ast::{
    ClassDecl, FnDecl, ImportDecl, ImportSpecifier, Module, ModuleDecl, ModuleItem, ObjectPatProp,
    Pat, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::patch::Edit;

/// A name we wanted to import is already bound to something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Conflict {
    pub name: String,
    pub binding: String,
}

/// Receivers that are always in scope and can never be imported.
const UNIMPORTABLE: &[&str] = &["this", "_ctx"];

/// Work out the edit that makes `names` importable from `path`.
///
/// A dotted name such as `i18n.global.t` is imported by its first segment.
/// Returns `Ok(None)` when everything is already imported.
pub(super) fn plan_import(
    module: &Module,
    code: &str,
    base: u32,
    names: &[&str],
    path: &str,
) -> Result<Option<Edit>, Conflict> {
    let offset = |pos: u32| pos.saturating_sub(base) as usize;
    let imports: Vec<&ImportDecl> = module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => Some(decl),
            _ => None,
        })
        .collect();
    let declared = DeclaredNames::collect(module);

    let mut missing = Vec::new();
    let mut heads: Vec<&str> = Vec::new();
    for name in names {
        let head = name.split('.').next().unwrap_or_default();
        if !head.is_empty() && !UNIMPORTABLE.contains(&head) && !heads.contains(&head) {
            heads.push(head);
        }
    }

    for &name in &heads {
        let imported_from = imports.iter().find_map(|decl| {
            decl.specifiers
                .iter()
                .any(|spec| local_name(spec) == name)
                .then(|| decl.src.value.as_str().unwrap_or_default())
        });
        match imported_from {
            Some(src) if src == path => {}
            Some(src) => {
                return Err(Conflict {
                    name: name.to_string(),
                    binding: format!("imported from \"{}\"", src),
                });
            }
            None => match declared.get(name) {
                Some(kind) => {
                    return Err(Conflict {
                        name: name.to_string(),
                        binding: format!("{} declaration", kind),
                    });
                }
                None => missing.push(name),
            },
        }
    }

    if missing.is_empty() {
        return Ok(None);
    }

    let existing = imports.iter().find(|decl| {
        decl.src.value.as_str() == Some(path)
            && !decl.type_only
            && !decl.specifiers.is_empty()
            && !decl
                .specifiers
                .iter()
                .any(|spec| matches!(spec, ImportSpecifier::Namespace(_)))
    });
    if let Some(decl) = existing {
        let last_named = decl.specifiers.iter().rev().find_map(|spec| match spec {
            ImportSpecifier::Named(named) => Some(named.span),
            _ => None,
        });
        let edit = match last_named {
            Some(span) => insert(offset(span.hi.0), format!(", {}", missing.join(", "))),
            None => {
                let default_end = decl.specifiers.iter().map(|spec| match spec {
                    ImportSpecifier::Default(default) => default.span.hi.0,
                    ImportSpecifier::Named(named) => named.span.hi.0,
                    ImportSpecifier::Namespace(ns) => ns.span.hi.0,
                });
                let Some(end) = default_end.max() else {
                    return Ok(None);
                };
                insert(offset(end), format!(", {{ {} }}", missing.join(", ")))
            }
        };
        return Ok(Some(edit));
    }

    let statement = format!("import {{ {} }} from \"{}\";", missing.join(", "), path);
    let edit = match imports.last() {
        Some(last) => insert(offset(last.span.hi.0), format!("\n{}", statement)),
        None if code.starts_with("#!") => match code.find('\n') {
            Some(newline) => insert(newline + 1, format!("{}\n", statement)),
            None => insert(code.len(), format!("\n{}", statement)),
        },
        None => insert(
            code.len() - code.trim_start().len(),
            format!("{}\n", statement),
        ),
    };
    Ok(Some(edit))
}

fn local_name(spec: &ImportSpecifier) -> &str {
    match spec {
        ImportSpecifier::Named(named) => &*named.local.sym,
        ImportSpecifier::Default(default) => &*default.local.sym,
        ImportSpecifier::Namespace(ns) => &*ns.local.sym,
    }
}

fn insert(at: usize, text: String) -> Edit {
    Edit {
        range: at..at,
        text,
    }
}

/// Functions, classes and variables declared anywhere in a module.
#[derive(Default)]
struct DeclaredNames {
    names: HashMap<String, &'static str>,
}

impl DeclaredNames {
    fn collect(module: &Module) -> HashMap<String, &'static str> {
        let mut collector = Self::default();
        module.visit_with(&mut collector);
        collector.names
    }

    fn declare(&mut self, name: &str, kind: &'static str) {
        self.names.entry(name.to_string()).or_insert(kind);
    }
}

impl Visit for DeclaredNames {
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.declare(&node.ident.sym, "function");
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.declare(&node.ident.sym, "class");
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let mut names = Vec::new();
        pat_names(&node.name, &mut names);
        for name in names {
            self.declare(&name, "variable");
        }
        node.init.visit_with(self);
    }
}

fn pat_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => out.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => pat_names(&assign.left, out),
        Pat::Rest(rest) => pat_names(&rest.arg, out),
        _ => {}
    }
}
