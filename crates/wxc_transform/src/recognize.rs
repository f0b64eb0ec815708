//! Classification of top-level statements into entry shapes.

use tracing::debug;
use wxc_ast::*;

use crate::query::{
    binds_top_level_name, find_top_level_function_by_name, name_equals, unwrap_parens,
};

/// What a top-level statement nominates as the cloud-function body.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryShape<'a> {
    /// `export default (a, b) => {}`, also through redundant parentheses.
    DefaultFunctionExpr {
        /// The function with parentheses stripped.
        expr: &'a Expr,
        function: FunctionLike<'a>,
        param_names: Vec<String>,
    },
    /// `export default sum` where `sum` is a top-level function.
    DefaultAlias {
        name: &'a Ident,
        function: FunctionLike<'a>,
        param_names: Vec<String>,
    },
    /// `export default function (a, b) {}` or `export default function sum(a, b) {}`.
    DefaultFunctionDecl {
        function: &'a FnExpr,
        param_names: Vec<String>,
    },
    /// A body-less signature of a default-exported function whose
    /// implementation is rewritten as [`EntryShape::DefaultFunctionDecl`].
    DefaultOverload { implementation: &'a FnExpr },
    /// The module already exports its own entry function.
    ExplicitMain { name: &'a Ident },
    Unrecognized,
}

impl EntryShape<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            EntryShape::DefaultFunctionExpr { .. } => "default-exported function expression",
            EntryShape::DefaultAlias { .. } => "default-exported alias",
            EntryShape::DefaultFunctionDecl { .. } => "default-exported function declaration",
            EntryShape::DefaultOverload { .. } => "default-exported overload signature",
            EntryShape::ExplicitMain { .. } => "explicit entry export",
            EntryShape::Unrecognized => "unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EntryShape::Unrecognized)
    }
}

/// Classify one top-level statement of `module`.
///
/// Shapes are tried in order: default-exported function expression,
/// default-exported alias, default-exported function declaration, explicit
/// entry export. The last one is skipped once `explicit_main_found`.
///
/// Default exports are left alone when the module already binds the entry
/// name at its top level, since the wrapper would redeclare it.
pub fn recognize<'a>(
    item: &'a ModuleItem,
    module: &'a Module,
    options: &TransformerOptions,
    explicit_main_found: bool,
) -> EntryShape<'a> {
    let export_name = options.export_name.as_str();

    if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = item {
        if entry_name_taken(module, export_name) {
            return EntryShape::Unrecognized;
        }
        let expr = unwrap_parens(&export.expr);

        // export default async (a, b) => {}
        if let Some(function) = FunctionLike::from_expr(expr) {
            return match mappable_params(function) {
                Some(param_names) => EntryShape::DefaultFunctionExpr {
                    expr,
                    function,
                    param_names,
                },
                None => EntryShape::Unrecognized,
            };
        }

        // export default sum
        if let Expr::Ident(name) = expr {
            return find_top_level_function_by_name(module, name)
                .and_then(|function| {
                    Some(EntryShape::DefaultAlias {
                        name,
                        function,
                        param_names: mappable_params(function)?,
                    })
                })
                .unwrap_or(EntryShape::Unrecognized);
        }

        return EntryShape::Unrecognized;
    }

    // export default function (a, b) {}
    if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
        decl: DefaultDecl::Fn(fn_expr),
        ..
    })) = item
    {
        if fn_expr.function.body.is_none() {
            return match find_default_implementation(module, fn_expr, export_name) {
                Some(implementation) => EntryShape::DefaultOverload { implementation },
                None => EntryShape::Unrecognized,
            };
        }
        return recognize_default_decl(fn_expr, module, export_name);
    }

    if !explicit_main_found {
        if let Some(name) = find_explicit_main(item, module, export_name) {
            return EntryShape::ExplicitMain { name };
        }
    }

    EntryShape::Unrecognized
}

fn recognize_default_decl<'a>(
    fn_expr: &'a FnExpr,
    module: &'a Module,
    export_name: &str,
) -> EntryShape<'a> {
    if entry_name_taken(module, export_name) {
        return EntryShape::Unrecognized;
    }
    // Anonymous overload signatures cannot follow the implementation's new name.
    if fn_expr.ident.is_none() && has_anonymous_default_signature(module) {
        debug!("anonymous default function has overload signatures, left as is");
        return EntryShape::Unrecognized;
    }
    match mappable_params(FunctionLike::Expr(fn_expr)) {
        Some(param_names) => EntryShape::DefaultFunctionDecl {
            function: fn_expr,
            param_names,
        },
        None => EntryShape::Unrecognized,
    }
}

/// The implementation a default-exported overload signature belongs to,
/// if it is rewritten too.
fn find_default_implementation<'a>(
    module: &'a Module,
    signature: &FnExpr,
    export_name: &str,
) -> Option<&'a FnExpr> {
    let name = signature.ident.as_ref()?;
    module.body.iter().find_map(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            decl: DefaultDecl::Fn(fn_expr),
            ..
        })) = item
        else {
            return None;
        };
        let is_implementation = fn_expr.function.body.is_some()
            && fn_expr.ident.as_ref().is_some_and(|ident| name_equals(ident, name));
        if !is_implementation {
            return None;
        }
        match recognize_default_decl(fn_expr, module, export_name) {
            EntryShape::DefaultFunctionDecl { function, .. } => Some(function),
            _ => None,
        }
    })
}

/// Whether `module` has an anonymous body-less `export default function`.
fn has_anonymous_default_signature(module: &Module) -> bool {
    module.body.iter().any(|item| {
        matches!(
            item,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
                decl: DefaultDecl::Fn(FnExpr { ident: None, function }),
                ..
            })) if function.body.is_none()
        )
    })
}

fn entry_name_taken(module: &Module, export_name: &str) -> bool {
    let taken = binds_top_level_name(module, export_name);
    if taken {
        debug!(name = export_name, "entry name already bound, default export left as is");
    }
    taken
}

fn mappable_params(function: FunctionLike<'_>) -> Option<Vec<String>> {
    let names = function.param_names();
    if names.is_none() {
        debug!(function = function.kind(), "parameters cannot be forwarded, left as is");
    }
    names
}

/// The exported entry binding declared by `item`, if any:
/// `export [async] function main() {}`, `export const main = <function>`
/// or `export const main = sum` with `sum` a top-level function.
pub fn find_explicit_main<'a>(
    item: &'a ModuleItem,
    module: &'a Module,
    export_name: &str,
) -> Option<&'a Ident> {
    let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item else {
        return None;
    };

    match &export.decl {
        Decl::Fn(fn_decl) if name_equals(&fn_decl.ident, export_name) => Some(&fn_decl.ident),
        Decl::Var(var) => var.decls.iter().find_map(|declarator| {
            let Pat::Ident(binding) = &declarator.name else {
                return None;
            };
            if !name_equals(&binding.id, export_name) {
                return None;
            }
            let init = unwrap_parens(declarator.init.as_deref()?);
            let resolves = match init {
                Expr::Ident(alias) => {
                    !name_equals(alias, export_name)
                        && find_top_level_function_by_name(module, alias).is_some()
                }
                init => FunctionLike::from_expr(init).is_some(),
            };
            resolves.then_some(&binding.id)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse;
    use pretty_assertions::assert_eq;

    fn shapes(source: &str) -> Vec<&'static str> {
        let module = parse(source);
        let options = TransformerOptions::default();
        module
            .body
            .iter()
            .map(|item| recognize(item, &module, &options, false).describe())
            .collect()
    }

    fn last_shape_params(source: &str) -> Option<Vec<String>> {
        let module = parse(source);
        let options = TransformerOptions::default();
        let item = module.body.last()?;
        match recognize(item, &module, &options, false) {
            EntryShape::DefaultFunctionExpr { param_names, .. }
            | EntryShape::DefaultAlias { param_names, .. }
            | EntryShape::DefaultFunctionDecl { param_names, .. } => Some(param_names),
            _ => None,
        }
    }

    #[test]
    fn default_function_expressions() {
        assert_eq!(
            shapes("export default (a: number, b: number) => a + b"),
            ["default-exported function expression"]
        );
        assert_eq!(
            shapes("export default async (a) => a"),
            ["default-exported function expression"]
        );
        assert_eq!(
            shapes("export default (((a, b) => {}))"),
            ["default-exported function expression"]
        );
        assert_eq!(
            shapes("export default (function named(a) {})"),
            ["default-exported function expression"]
        );
    }

    #[test]
    fn parenthesized_function_is_unwrapped() {
        let module = parse("export default (((a: number, b: number) => {}))");
        let options = TransformerOptions::default();
        let shape = recognize(&module.body[0], &module, &options, false);
        let EntryShape::DefaultFunctionExpr { expr, .. } = shape else {
            panic!("expected a function expression");
        };
        assert!(matches!(expr, Expr::Arrow(_)));
    }

    #[test]
    fn aliases_resolve_to_top_level_functions() {
        assert_eq!(
            shapes("const sum = (a, b) => a + b; export default sum"),
            ["unrecognized", "default-exported alias"]
        );
        assert_eq!(
            shapes("async function named(a, b) {} export default named"),
            ["unrecognized", "default-exported alias"]
        );
        assert_eq!(
            last_shape_params("const sum = async function named(a, b) {}; export default sum"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn unsupported_default_exports_are_unrecognized() {
        assert_eq!(
            shapes("import util from './util'; export default util"),
            ["unrecognized", "unrecognized"]
        );
        assert_eq!(shapes("export { default } from './util'"), ["unrecognized"]);
        assert_eq!(shapes("export { source as default } from './util'"), ["unrecognized"]);
        assert_eq!(shapes("export default makeTransformer()"), ["unrecognized"]);
        assert_eq!(shapes("export default wrap((a) => a)"), ["unrecognized"]);
        assert_eq!(
            shapes("function outer() { const inner = (a) => a } export default inner"),
            ["unrecognized", "unrecognized"]
        );
    }

    #[test]
    fn default_function_declarations() {
        assert_eq!(
            shapes("export default function (a, b) {}"),
            ["default-exported function declaration"]
        );
        assert_eq!(
            shapes("export default async function sum(a, b) {}"),
            ["default-exported function declaration"]
        );
    }

    #[test]
    fn parameter_names_follow_declaration_order() {
        assert_eq!(
            last_shape_params("export default (a: number, b: number, c: number) => {}"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(
            last_shape_params("export default function (this: Window, a = 1) {}"),
            Some(vec!["a".to_string()])
        );
        assert_eq!(last_shape_params("export default () => {}"), Some(vec![]));
    }

    #[test]
    fn unmappable_parameters_are_unrecognized() {
        assert_eq!(shapes("export default ({ a }) => a"), ["unrecognized"]);
        assert_eq!(shapes("export default (...rest) => rest"), ["unrecognized"]);
        assert_eq!(
            shapes("const f = ([a]) => a; export default f"),
            ["unrecognized", "unrecognized"]
        );
    }

    #[test]
    fn default_named_like_the_entry_is_unrecognized() {
        assert_eq!(shapes("export default function main(a) {}"), ["unrecognized"]);
        assert_eq!(
            shapes("function main(a) {} export default main"),
            ["unrecognized", "unrecognized"]
        );
    }

    #[test]
    fn defaults_are_unrecognized_when_the_entry_name_is_bound() {
        assert_eq!(
            shapes("const main = 1;\nexport default (a) => a + main"),
            ["unrecognized", "unrecognized"]
        );
        assert_eq!(
            shapes("import { main } from './x';\nexport default (a) => main(a)"),
            ["unrecognized", "unrecognized"]
        );
        assert_eq!(
            shapes("function sum(a) {}\nexport default sum\nfunction main() {}"),
            ["unrecognized", "unrecognized", "unrecognized"]
        );
        assert_eq!(
            shapes("export default function (a) {}\nexport const main = () => {}"),
            ["unrecognized", "explicit entry export"]
        );
        assert_eq!(
            shapes("export default (a) => a + main"),
            ["default-exported function expression"]
        );
    }

    #[test]
    fn overload_signatures_follow_their_implementation() {
        let source = "export default function sum(a: string): string;\n\
                      export default function sum(a: number): number;\n\
                      export default function sum(a: any) { return a }";
        assert_eq!(
            shapes(source),
            [
                "default-exported overload signature",
                "default-exported overload signature",
                "default-exported function declaration"
            ]
        );

        let unmappable = "export default function sum(a: string): string;\n\
                          export default function sum(...a: any[]) { return a }";
        assert_eq!(shapes(unmappable), ["unrecognized", "unrecognized"]);

        let anonymous = "export default function (a: string): string;\n\
                         export default function (a: any) { return a }";
        assert_eq!(shapes(anonymous), ["unrecognized", "unrecognized"]);
    }

    #[test]
    fn explicit_main_shapes() {
        assert_eq!(
            shapes("export async function main(event, context) {}"),
            ["explicit entry export"]
        );
        assert_eq!(
            shapes("export function main(a: number, b: number) {}"),
            ["explicit entry export"]
        );
        assert_eq!(
            shapes("export const main = async (event, context) => {}"),
            ["explicit entry export"]
        );
        assert_eq!(shapes("export const main = (function () {})"), ["explicit entry export"]);
        assert_eq!(
            shapes("const sub = () => {}; export const main = sub"),
            ["unrecognized", "explicit entry export"]
        );
    }

    #[test]
    fn unresolved_main_is_unrecognized() {
        assert_eq!(shapes("export const main = sub"), ["unrecognized"]);
        assert_eq!(shapes("export const main = main"), ["unrecognized"]);
        assert_eq!(shapes("export const main = 1"), ["unrecognized"]);
        assert_eq!(shapes("export function handler() {}"), ["unrecognized"]);
        assert_eq!(shapes("async function main() {}"), ["unrecognized"]);
    }

    #[test]
    fn explicit_main_is_matched_once() {
        let module = parse("export async function main() {}");
        let options = TransformerOptions::default();
        assert_eq!(recognize(&module.body[0], &module, &options, true), EntryShape::Unrecognized);
    }

    #[test]
    fn export_name_is_configurable() {
        let module = parse("export const handler = () => {}; export const main = () => {}");
        let options = TransformerOptions {
            export_name: "handler".to_string(),
            ..TransformerOptions::default()
        };
        let found: Vec<_> = module
            .body
            .iter()
            .map(|item| recognize(item, &module, &options, false).is_recognized())
            .collect();
        assert_eq!(found, [true, false]);
    }
}
