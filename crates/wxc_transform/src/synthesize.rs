//! Replacement items for recognized entry shapes.

use swc_common::{SyntaxContext, DUMMY_SP};
use tracing::debug;
use wxc_ast::*;

use crate::build::{
    build_call, build_function_declaration, build_import_statement, build_parameter_declaration,
    build_property_access, build_sdk_init_call, build_single_variable_statement,
    clone_function_declaration, FunctionOptions, ParamOptions,
};
use crate::error::BuildError;
use crate::names::UniqueNames;
use crate::query::{find_existing_import, has_top_level_call};
use crate::recognize::EntryShape;

/// Parameter names reported for a module that exports its own entry.
const EXPLICIT_MAIN_PARAMS: &[&str] = &["data"];

/// Items that replace one recognized statement, and the event it yields.
///
/// Overload signatures are rewritten without yielding an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub items: Vec<ModuleItem>,
    pub event: Option<EntryEvent>,
}

/// Per-call synthesis state: generated names and whether the SDK import
/// and init call are already in place.
pub struct Synthesizer<'o> {
    options: &'o TransformerOptions,
    file_path: String,
    names: UniqueNames,
    sdk_ready: bool,
}

impl<'o> Synthesizer<'o> {
    pub fn new(
        options: &'o TransformerOptions,
        module: &Module,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            options,
            file_path: file_path.into(),
            names: UniqueNames::for_module(module),
            sdk_ready: false,
        }
    }

    /// Build the replacement for `item`, classified as `shape`.
    ///
    /// Returns `Ok(None)` for unrecognized statements. On error nothing has
    /// been recorded, so the statement can be kept as is.
    pub fn synthesize(
        &mut self,
        shape: &EntryShape<'_>,
        item: &ModuleItem,
        module: &Module,
    ) -> Result<Option<Synthesized>, BuildError> {
        let (items, param_names, is_explicit_main) = match shape {
            // const default_1 = (a, b) => {}
            EntryShape::DefaultFunctionExpr { expr, param_names, .. } => {
                let name = self.names.fresh("default");
                let wrapper = self.build_wrapper(&name, param_names)?;
                let init = Some(Box::new((*expr).clone()));
                let definition = build_single_variable_statement(name, init, VarDeclKind::Const);

                let mut items = vec![ModuleItem::Stmt(definition)];
                items.extend(self.ensure_sdk(module));
                items.push(wrapper);
                (items, param_names.clone(), false)
            }
            // the aliased function stays where it is
            EntryShape::DefaultAlias { name, param_names, .. } => {
                let wrapper = self.build_wrapper(name, param_names)?;

                let mut items = self.ensure_sdk(module);
                items.push(wrapper);
                (items, param_names.clone(), false)
            }
            // function default_1(a, b) {}
            EntryShape::DefaultFunctionDecl { function, param_names } => {
                let name = match &function.ident {
                    Some(ident) => ident.clone(),
                    None => self.names.fresh("default"),
                };
                let definition = clone_function_declaration(item, |options| {
                    strip_export(options);
                    options.name = Some(name.clone());
                })?;
                let wrapper = self.build_wrapper(&name, param_names)?;

                let mut items = vec![definition];
                items.extend(self.ensure_sdk(module));
                items.push(wrapper);
                (items, param_names.clone(), false)
            }
            // function sum(a: string): string;
            EntryShape::DefaultOverload { .. } => {
                let signature = clone_function_declaration(item, strip_export)?;
                return Ok(Some(Synthesized {
                    items: vec![signature],
                    event: None,
                }));
            }
            EntryShape::ExplicitMain { .. } => {
                let mut items = self.ensure_sdk(module);
                items.push(item.clone());
                let param_names = EXPLICIT_MAIN_PARAMS
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                (items, param_names, true)
            }
            EntryShape::Unrecognized => return Ok(None),
        };

        Ok(Some(Synthesized {
            items,
            event: Some(EntryEvent {
                file_path: self.file_path.clone(),
                param_names,
                is_explicit_main,
            }),
        }))
    }

    /// `export async function main(event: any) { return target(event.a, event.b) }`
    fn build_wrapper(
        &self,
        target: &Ident,
        param_names: &[String],
    ) -> Result<ModuleItem, BuildError> {
        let event = Ident::new_no_ctxt(self.options.first_param_name.as_str().into(), DUMMY_SP);
        let args = param_names
            .iter()
            .map(|name| build_property_access(&event, name))
            .collect();
        let call = build_call(Expr::Ident(target.clone()), args);

        build_function_declaration(FunctionOptions {
            modifiers: vec![Modifier::Export, Modifier::Async],
            name: Some(Ident::new_no_ctxt(self.options.export_name.as_str().into(), DUMMY_SP)),
            params: build_parameter_declaration(ParamOptions::new(event)).into(),
            body: Some(BlockStmt {
                span: DUMMY_SP,
                ctxt: SyntaxContext::empty(),
                stmts: vec![Stmt::Return(ReturnStmt {
                    span: DUMMY_SP,
                    arg: Some(Box::new(call)),
                })],
            }),
            ..Default::default()
        })
    }

    /// The SDK import and init call still missing from `module`.
    ///
    /// Only the first call in a transform looks at the module; afterwards
    /// the SDK counts as set up.
    fn ensure_sdk(&mut self, module: &Module) -> Vec<ModuleItem> {
        if self.sdk_ready {
            return Vec::new();
        }
        self.sdk_ready = true;

        let mut items = Vec::new();
        let sdk_module = self.options.sdk_module_name.as_str();

        let binding = match find_existing_import(module, sdk_module) {
            Some(existing) => {
                debug!(
                    binding = %existing.imported_name.sym,
                    module = sdk_module,
                    "found existing sdk import"
                );
                existing.imported_name.clone()
            }
            None => {
                let (binding, import) = build_import_statement(
                    self.options.sdk_binding_name.as_str(),
                    sdk_module,
                    &mut self.names,
                );
                debug!(binding = %binding.sym, module = sdk_module, "adding sdk import");
                items.push(import);
                binding
            }
        };

        if has_top_level_call(module, binding.sym.as_str(), "init") {
            debug!(binding = %binding.sym, "found existing sdk init call");
        } else {
            debug!(binding = %binding.sym, "adding sdk init call");
            items.push(ModuleItem::Stmt(build_sdk_init_call(&binding)));
        }

        items
    }
}

fn strip_export(options: &mut FunctionOptions) {
    options
        .modifiers
        .retain(|modifier| !matches!(modifier, Modifier::Export | Modifier::Default));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{find_existing_import, modifiers};
    use crate::recognize::recognize;
    use crate::test_utils::parse;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Vec<Synthesized> {
        let module = parse(source);
        let options = TransformerOptions::default();
        let mut synthesizer = Synthesizer::new(&options, &module, "test.ts");
        module
            .body
            .iter()
            .filter_map(|item| {
                let shape = recognize(item, &module, &options, false);
                synthesizer.synthesize(&shape, item, &module).unwrap()
            })
            .collect()
    }

    fn wrapper_call(item: &ModuleItem) -> &CallExpr {
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Fn(wrapper), ..
        })) = item
        else {
            panic!("expected an exported wrapper, got {item:?}");
        };
        let body = wrapper.function.body.as_ref().unwrap();
        let [Stmt::Return(ReturnStmt { arg: Some(arg), .. })] = &body.stmts[..] else {
            panic!("expected a single return");
        };
        let Expr::Call(call) = &**arg else {
            panic!("expected a call");
        };
        call
    }

    fn callee_name(call: &CallExpr) -> &str {
        match &call.callee {
            Callee::Expr(expr) => match &**expr {
                Expr::Ident(ident) => ident.sym.as_str(),
                other => panic!("unexpected callee {other:?}"),
            },
            other => panic!("unexpected callee {other:?}"),
        }
    }

    fn arg_properties(call: &CallExpr) -> Vec<String> {
        call.args
            .iter()
            .map(|arg| match &*arg.expr {
                Expr::Member(MemberExpr {
                    obj,
                    prop: MemberProp::Ident(prop),
                    ..
                }) => format!("{}.{}", obj.as_ident().unwrap().sym, prop.sym),
                other => panic!("unexpected argument {other:?}"),
            })
            .collect()
    }

    #[test]
    fn default_arrow_is_bound_and_wrapped() {
        let results =
            run("import util from './util'\nexport default (a: number, b: number) => a + b");
        let [result] = &results[..] else {
            panic!("expected one entry");
        };
        assert_eq!(result.items.len(), 4);

        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &result.items[0] else {
            panic!("expected the renamed definition first");
        };
        let Pat::Ident(binding) = &var.decls[0].name else {
            panic!("expected a plain binding");
        };
        assert_eq!(binding.id.sym.as_str(), "default_1");
        assert!(matches!(var.decls[0].init.as_deref(), Some(Expr::Arrow(_))));

        let call = wrapper_call(&result.items[3]);
        assert_eq!(callee_name(call), "default_1");
        assert_eq!(arg_properties(call), ["event.a", "event.b"]);

        assert_eq!(
            result.event,
            Some(EntryEvent {
                file_path: "test.ts".into(),
                param_names: vec!["a".into(), "b".into()],
                is_explicit_main: false,
            })
        );
    }

    #[test]
    fn sdk_import_and_init_are_added() {
        let results = run("export default () => {}");
        let items = &results[0].items;
        let module = Module {
            span: DUMMY_SP,
            body: items.clone(),
            shebang: None,
        };
        let import = find_existing_import(&module, "wx-server-sdk").unwrap();
        assert_eq!(import.imported_name.sym.as_str(), "cloud");
        assert!(has_top_level_call(&module, "cloud", "init"));
        assert!(matches!(items[1], ModuleItem::ModuleDecl(ModuleDecl::Import(_))));
        assert!(matches!(items[2], ModuleItem::Stmt(Stmt::Expr(_))));
    }

    #[test]
    fn existing_sdk_setup_is_reused() {
        let source =
            "import sdk from 'wx-server-sdk'\nsdk.init({ env: 'prod' })\nexport default (a) => a";
        let results = run(source);
        let items = &results[0].items;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], ModuleItem::Stmt(Stmt::Decl(_))));
        assert_eq!(arg_properties(wrapper_call(&items[1])), ["event.a"]);
    }

    #[test]
    fn existing_import_without_init_gets_init() {
        let results = run(
            "import * as wx from 'wx-server-sdk'\nconst sum = (a, b) => a + b\nexport default sum",
        );
        let items = &results[0].items;
        assert_eq!(items.len(), 2);
        let module = Module {
            span: DUMMY_SP,
            body: items.clone(),
            shebang: None,
        };
        assert!(has_top_level_call(&module, "wx", "init"));
        assert_eq!(callee_name(wrapper_call(&items[1])), "sum");
    }

    #[test]
    fn sdk_binding_avoids_user_names() {
        let results = run("const cloud = 'mine'\nexport default () => cloud");
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &results[0].items[1] else {
            panic!("expected an import");
        };
        let [ImportSpecifier::Default(spec)] = &import.specifiers[..] else {
            panic!("expected a default specifier");
        };
        assert_eq!(spec.local.sym.as_str(), "cloud_1");
    }

    #[test]
    fn default_function_loses_export_modifiers() {
        let results = run("export default async function (a: number, b: number) { return a + b }");
        let items = &results[0].items;
        assert_eq!(modifiers(&items[0]), [Modifier::Async]);
        let ModuleItem::Stmt(Stmt::Decl(Decl::Fn(definition))) = &items[0] else {
            panic!("expected a plain function declaration");
        };
        assert_eq!(definition.ident.sym.as_str(), "default_1");
        assert_eq!(callee_name(wrapper_call(&items[3])), "default_1");
    }

    #[test]
    fn named_default_function_keeps_its_name() {
        let results = run("export default function sum(a, b) { return a + b }");
        let ModuleItem::Stmt(Stmt::Decl(Decl::Fn(definition))) = &results[0].items[0] else {
            panic!("expected a plain function declaration");
        };
        assert_eq!(definition.ident.sym.as_str(), "sum");
    }

    #[test]
    fn explicit_main_is_kept_after_sdk_setup() {
        let source = "export async function main(event, context) { return event }";
        let module = parse(source);
        let results = run(source);
        let items = &results[0].items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], module.body[0]);
        let event = results[0].event.as_ref().unwrap();
        assert_eq!(event.param_names, ["data"]);
        assert!(event.is_explicit_main);
    }

    #[test]
    fn sdk_is_set_up_once_per_call() {
        let module = parse("export default () => {}");
        let options = TransformerOptions::default();
        let mut synthesizer = Synthesizer::new(&options, &module, "test.ts");
        let shape = recognize(&module.body[0], &module, &options, false);
        let first = synthesizer.synthesize(&shape, &module.body[0], &module).unwrap().unwrap();
        let second = synthesizer.synthesize(&shape, &module.body[0], &module).unwrap().unwrap();
        assert_eq!(first.items.len(), 4);
        assert_eq!(second.items.len(), 2);
        assert_ne!(first.items[0], second.items[0]);
    }

    #[test]
    fn overload_signatures_lose_export_modifiers() {
        let results = run("export default function sum(a: string): string;\n\
                           export default function sum(a: any) { return a }");
        let [signature, implementation] = &results[..] else {
            panic!("expected the signature and the implementation");
        };
        assert_eq!(signature.event, None);
        let [ModuleItem::Stmt(Stmt::Decl(Decl::Fn(decl)))] = &signature.items[..] else {
            panic!("expected a plain signature, got {:?}", signature.items);
        };
        assert_eq!(decl.ident.sym.as_str(), "sum");
        assert!(decl.function.body.is_none());
        assert_eq!(callee_name(wrapper_call(&implementation.items[3])), "sum");
    }

    #[test]
    fn wrapper_uses_configured_names() {
        let module = parse("export default (a) => a");
        let options = TransformerOptions {
            export_name: "handler".into(),
            first_param_name: "payload".into(),
            ..TransformerOptions::default()
        };
        let mut synthesizer = Synthesizer::new(&options, &module, "handler.ts");
        let shape = recognize(&module.body[0], &module, &options, false);
        let result = synthesizer.synthesize(&shape, &module.body[0], &module).unwrap().unwrap();

        let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Fn(wrapper), ..
        })) = &result.items[3]
        else {
            panic!("expected an exported wrapper");
        };
        assert_eq!(wrapper.ident.sym.as_str(), "handler");
        assert_eq!(arg_properties(wrapper_call(&result.items[3])), ["payload.a"]);
        assert_eq!(result.event.unwrap().file_path, "handler.ts");
    }

    #[test]
    fn unrecognized_statements_yield_nothing() {
        assert!(run("export default makeTransformer()").is_empty());
    }
}
