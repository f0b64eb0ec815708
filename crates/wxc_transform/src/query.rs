//! Search helpers over the module tree.
//!
//! Names are compared by their text, never by node identity: the same
//! binding is spelled by distinct `Ident` nodes at its declaration and at
//! every use.

use swc_ecma_visit::{Visit, VisitWith};
use wxc_ast::*;

/// Anything that carries a name to compare an identifier against.
pub trait NameLike {
    fn name(&self) -> &str;
}

impl NameLike for Ident {
    fn name(&self) -> &str {
        self.sym.as_str()
    }
}

impl NameLike for str {
    fn name(&self) -> &str {
        self
    }
}

impl NameLike for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Whether `ident` spells the same name as `target`.
pub fn name_equals<N: NameLike + ?Sized>(ident: &Ident, target: &N) -> bool {
    ident.sym.as_str() == target.name()
}

/// A predicate matching exactly the identifier nodes named like `ident`.
pub fn make_name_predicate(ident: &Ident) -> impl FnMut(NodeRef<'_>) -> bool {
    let name = ident.sym.clone();
    move |node| matches!(node, NodeRef::Ident(found) if found.sym == name)
}

/// Visitor behind [`find_descendant`].
pub struct Finder<P> {
    predicate: P,
    found: Option<Node>,
}

impl<P> Finder<P>
where
    P: FnMut(NodeRef<'_>) -> bool,
{
    /// Returns `true` if the search is over, either earlier or on `node`.
    fn check(&mut self, node: NodeRef<'_>) -> bool {
        if self.found.is_some() {
            return true;
        }
        if (self.predicate)(node) {
            self.found = Some(node.to_node());
            return true;
        }
        false
    }
}

impl<P> Visit for Finder<P>
where
    P: FnMut(NodeRef<'_>) -> bool,
{
    fn visit_expr(&mut self, node: &Expr) {
        if !self.check(NodeRef::Expr(node)) {
            node.visit_children_with(self);
        }
    }

    fn visit_pat(&mut self, node: &Pat) {
        if !self.check(NodeRef::Pat(node)) {
            node.visit_children_with(self);
        }
    }

    fn visit_ident(&mut self, node: &Ident) {
        self.check(NodeRef::Ident(node));
    }

    // Value-level names never live inside type annotations.
    fn visit_ts_type_ann(&mut self, _: &TsTypeAnn) {}

    fn visit_ts_type(&mut self, _: &TsType) {}

    fn visit_ts_type_param_decl(&mut self, _: &TsTypeParamDecl) {}

    fn visit_ts_type_param_instantiation(&mut self, _: &TsTypeParamInstantiation) {}
}

/// Depth-first, pre-order search below `node` (not `node` itself).
///
/// Stops descending as soon as a node satisfies `predicate` and returns a
/// copy of it.
pub fn find_descendant<N, P>(node: &N, predicate: P) -> Option<Node>
where
    N: VisitWith<Finder<P>>,
    P: FnMut(NodeRef<'_>) -> bool,
{
    let mut finder = Finder {
        predicate,
        found: None,
    };
    node.visit_children_with(&mut finder);
    finder.found
}

/// Strip any number of redundant parentheses.
pub fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

/// Resolve `name` to a function bound at the top level of `module`.
///
/// Only direct top-level statements are considered, plain or exported:
/// `const name = <arrow or function expression>` (parenthesized or not)
/// and `function name() {}`. Nested scopes are never searched. The first
/// match in statement order wins.
pub fn find_top_level_function_by_name<'a>(
    module: &'a Module,
    name: &Ident,
) -> Option<FunctionLike<'a>> {
    module.body.iter().find_map(|item| {
        let decl = match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
            _ => return None,
        };

        match decl {
            // const sum = (a, b) => {}
            // const sum = function named(a, b) {}
            // const sum = ((a, b) => {})
            Decl::Var(var) => var.decls.iter().find_map(|declarator| {
                find_descendant(&declarator.name, make_name_predicate(name))?;
                FunctionLike::from_expr(unwrap_parens(declarator.init.as_deref()?))
            }),
            // function sum(a, b) {}
            Decl::Fn(fn_decl) if name_equals(&fn_decl.ident, name) => {
                Some(FunctionLike::Decl(fn_decl))
            }
            _ => None,
        }
    })
}

/// Whether a top-level statement of `module` declares or imports `name`.
///
/// Covers function, class, variable, enum and namespace declarations
/// (plain, exported or default-exported), import specifiers and
/// `import x = require()`. Type aliases and interfaces do not count.
pub fn binds_top_level_name(module: &Module, name: &str) -> bool {
    module.body.iter().any(|item| match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl_binds(decl, name),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_binds(&export.decl, name),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
            DefaultDecl::Fn(FnExpr { ident: Some(ident), .. })
            | DefaultDecl::Class(ClassExpr { ident: Some(ident), .. }) => name_equals(ident, name),
            _ => false,
        },
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => import.specifiers.iter().any(|spec| {
            let local = match spec {
                ImportSpecifier::Named(named) => &named.local,
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(namespace) => &namespace.local,
            };
            name_equals(local, name)
        }),
        ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(import)) => name_equals(&import.id, name),
        _ => false,
    })
}

fn decl_binds(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Fn(fn_decl) => name_equals(&fn_decl.ident, name),
        Decl::Class(class) => name_equals(&class.ident, name),
        Decl::Var(var) => var.decls.iter().any(|declarator| pat_binds(&declarator.name, name)),
        Decl::TsEnum(ts_enum) => name_equals(&ts_enum.id, name),
        Decl::TsModule(ts_module) => match &ts_module.id {
            TsModuleName::Ident(ident) => name_equals(ident, name),
            TsModuleName::Str(_) => false,
        },
        _ => false,
    }
}

/// Binding names only: default values and computed keys are skipped.
fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(binding) => name_equals(&binding.id, name),
        Pat::Array(array) => array.elems.iter().flatten().any(|elem| pat_binds(elem, name)),
        Pat::Object(object) => object.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(key_value) => pat_binds(&key_value.value, name),
            ObjectPatProp::Assign(assign) => name_equals(&assign.key.id, name),
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        Pat::Rest(rest) => pat_binds(&rest.arg, name),
        Pat::Assign(assign) => pat_binds(&assign.left, name),
        _ => false,
    }
}

/// An existing value import of a module.
#[derive(Debug, Clone, Copy)]
pub struct ExistingImport<'a> {
    /// Local binding of the default or namespace specifier.
    pub imported_name: &'a Ident,
    pub declaration: &'a ImportDecl,
}

/// Find a top-level `import x from '<module_name>'` (or `import * as x`).
///
/// Type-only imports and imports that bind neither a default nor a
/// namespace do not count.
pub fn find_existing_import<'a>(
    module: &'a Module,
    module_name: &str,
) -> Option<ExistingImport<'a>> {
    module.body.iter().find_map(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return None;
        };
        if import.type_only || import.src.value.as_str() != Some(module_name) {
            return None;
        }
        import.specifiers.iter().find_map(|spec| {
            let local = match spec {
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(namespace) => &namespace.local,
                ImportSpecifier::Named(_) => return None,
            };
            Some(ExistingImport {
                imported_name: local,
                declaration: import,
            })
        })
    })
}

/// Whether a top-level statement calls `<object_name>.<property_name>(...)`.
pub fn has_top_level_call(module: &Module, object_name: &str, property_name: &str) -> bool {
    module.body.iter().any(|item| match item {
        ModuleItem::Stmt(Stmt::Expr(stmt)) => {
            is_property_call(&stmt.expr, object_name, property_name)
        }
        _ => false,
    })
}

fn is_property_call(expr: &Expr, object_name: &str, property_name: &str) -> bool {
    let expr = match unwrap_parens(expr) {
        Expr::Await(await_expr) => unwrap_parens(&await_expr.arg),
        expr => expr,
    };
    let Expr::Call(call) = expr else {
        return false;
    };
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = unwrap_parens(callee) else {
        return false;
    };
    let Expr::Ident(object) = unwrap_parens(&member.obj) else {
        return false;
    };
    let MemberProp::Ident(property) = &member.prop else {
        return false;
    };
    name_equals(object, object_name) && property.sym.as_str() == property_name
}

/// The modifier list of a top-level item.
pub fn modifiers(item: &ModuleItem) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    let decl = match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
            modifiers.push(Modifier::Export);
            Some(&export.decl)
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
            modifiers.push(Modifier::Export);
            modifiers.push(Modifier::Default);
            if let DefaultDecl::Fn(fn_expr) = &export.decl {
                if fn_expr.function.is_async {
                    modifiers.push(Modifier::Async);
                }
            }
            None
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(_)) => {
            modifiers.push(Modifier::Export);
            modifiers.push(Modifier::Default);
            None
        }
        ModuleItem::Stmt(Stmt::Decl(decl)) => Some(decl),
        _ => None,
    };

    match decl {
        Some(Decl::Fn(fn_decl)) => {
            if fn_decl.declare {
                modifiers.push(Modifier::Declare);
            }
            if fn_decl.function.is_async {
                modifiers.push(Modifier::Async);
            }
        }
        Some(Decl::Var(var)) if var.declare => modifiers.push(Modifier::Declare),
        Some(Decl::Class(class)) if class.declare => modifiers.push(Modifier::Declare),
        _ => {}
    }

    modifiers
}

pub fn has_modifier(item: &ModuleItem, modifier: Modifier) -> bool {
    modifiers(item).contains(&modifier)
}

pub fn is_exported(item: &ModuleItem) -> bool {
    has_modifier(item, Modifier::Export)
}

pub fn is_default_export(item: &ModuleItem) -> bool {
    has_modifier(item, Modifier::Default)
}
