//! Builders for the tree fragments the entry synthesis inserts.

use swc_common::{Span, SyntaxContext, DUMMY_SP};
use wxc_ast::*;

use crate::error::BuildError;
use crate::names::UniqueNames;
use crate::query::modifiers;

/// One parameter or an ordered list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Single(Param),
    List(Vec<Param>),
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::List(Vec::new())
    }
}

impl From<Param> for Parameters {
    fn from(param: Param) -> Self {
        Parameters::Single(param)
    }
}

impl From<Vec<Param>> for Parameters {
    fn from(params: Vec<Param>) -> Self {
        Parameters::List(params)
    }
}

impl Parameters {
    pub fn into_vec(self) -> Vec<Param> {
        match self {
            Parameters::Single(param) => vec![param],
            Parameters::List(params) => params,
        }
    }
}

/// Field record of a function declaration.
#[derive(Debug, Clone, Default)]
pub struct FunctionOptions {
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<Modifier>,
    pub is_generator: bool,
    pub name: Option<Ident>,
    pub type_params: Option<Box<TsTypeParamDecl>>,
    pub params: Parameters,
    pub return_type: Option<Box<TsTypeAnn>>,
    pub body: Option<BlockStmt>,
    pub span: Span,
}

impl FunctionOptions {
    /// Copy every field of a function declaration item, plain, exported or
    /// default-exported.
    pub fn from_item(item: &ModuleItem) -> Option<Self> {
        let (name, function) = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(fn_decl))) => {
                (Some(&fn_decl.ident), &fn_decl.function)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Fn(fn_decl) => (Some(&fn_decl.ident), &fn_decl.function),
                _ => return None,
            },
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => (fn_expr.ident.as_ref(), &fn_expr.function),
                _ => return None,
            },
            _ => return None,
        };

        Some(Self {
            decorators: function.decorators.clone(),
            modifiers: modifiers(item),
            is_generator: function.is_generator,
            name: name.cloned(),
            type_params: function.type_params.clone(),
            params: Parameters::List(function.params.clone()),
            return_type: function.return_type.clone(),
            body: function.body.clone(),
            span: function.span,
        })
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Assemble a function declaration item.
///
/// `export` + `default` gives `export default function`, which may be
/// anonymous; `export` alone gives `export function`; no modifier gives a
/// plain declaration statement. `async` and `declare` set the matching flags.
pub fn build_function_declaration(options: FunctionOptions) -> Result<ModuleItem, BuildError> {
    let is_export = options.has_modifier(Modifier::Export);
    let is_default = options.has_modifier(Modifier::Default);
    let declare = options.has_modifier(Modifier::Declare);

    let function = Box::new(Function {
        params: options.params.into_vec(),
        decorators: options.decorators,
        span: options.span,
        ctxt: SyntaxContext::empty(),
        body: options.body,
        is_generator: options.is_generator,
        is_async: options.modifiers.contains(&Modifier::Async),
        type_params: options.type_params,
        return_type: options.return_type,
    });

    match (is_export, is_default) {
        (true, true) => Ok(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            span: options.span,
            decl: DefaultDecl::Fn(FnExpr {
                ident: options.name,
                function,
            }),
        }))),
        (false, true) => Err(BuildError::DefaultWithoutExport),
        (is_export, false) => {
            let ident = options.name.ok_or(BuildError::AnonymousFunction)?;
            let decl = Decl::Fn(FnDecl {
                ident,
                declare,
                function,
            });
            Ok(if is_export {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    span: options.span,
                    decl,
                }))
            } else {
                ModuleItem::Stmt(Stmt::Decl(decl))
            })
        }
    }
}

/// Copy a function declaration item, then let `patch` override fields.
pub fn clone_function_declaration(
    item: &ModuleItem,
    patch: impl FnOnce(&mut FunctionOptions),
) -> Result<ModuleItem, BuildError> {
    let mut options = FunctionOptions::from_item(item).ok_or(BuildError::NotAFunction)?;
    patch(&mut options);
    build_function_declaration(options)
}

/// Field record of a parameter.
#[derive(Debug, Clone)]
pub struct ParamOptions {
    pub decorators: Vec<Decorator>,
    pub rest: bool,
    pub name: Ident,
    pub optional: bool,
    /// Defaults to `any`.
    pub type_ann: Option<Box<TsType>>,
    pub initializer: Option<Box<Expr>>,
}

impl ParamOptions {
    pub fn new(name: Ident) -> Self {
        Self {
            decorators: Vec::new(),
            rest: false,
            name,
            optional: false,
            type_ann: None,
            initializer: None,
        }
    }
}

/// `name: any`, `name?: T`, `...name: T` or `name: T = init`.
pub fn build_parameter_declaration(options: ParamOptions) -> Param {
    let type_ann = options.type_ann.unwrap_or_else(any_type);
    let type_ann = Some(Box::new(TsTypeAnn {
        span: DUMMY_SP,
        type_ann,
    }));

    let mut id = options.name;
    id.optional = options.optional;

    let pat = if options.rest {
        Pat::Rest(RestPat {
            span: DUMMY_SP,
            dot3_token: DUMMY_SP,
            arg: Box::new(Pat::Ident(BindingIdent { id, type_ann: None })),
            type_ann,
        })
    } else {
        Pat::Ident(BindingIdent { id, type_ann })
    };

    let pat = match options.initializer {
        Some(right) => Pat::Assign(AssignPat {
            span: DUMMY_SP,
            left: Box::new(pat),
            right,
        }),
        None => pat,
    };

    Param {
        span: DUMMY_SP,
        decorators: options.decorators,
        pat,
    }
}

fn any_type() -> Box<TsType> {
    Box::new(TsType::TsKeywordType(TsKeywordType {
        span: DUMMY_SP,
        kind: TsKeywordTypeKind::TsAnyKeyword,
    }))
}

/// `<kind> name = init;`
pub fn build_single_variable_statement(
    name: Ident,
    init: Option<Box<Expr>>,
    kind: VarDeclKind,
) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: name,
                type_ann: None,
            }),
            init,
            definite: false,
        }],
    })))
}

/// Local binding of a synthesized import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBinding {
    /// Bind exactly this identifier.
    Exact(Ident),
    /// Bind this name, or a suffixed variant if the module already uses it.
    Preferred(String),
}

impl From<Ident> for ImportBinding {
    fn from(ident: Ident) -> Self {
        ImportBinding::Exact(ident)
    }
}

impl From<&str> for ImportBinding {
    fn from(name: &str) -> Self {
        ImportBinding::Preferred(name.to_string())
    }
}

/// `import <binding> from '<module_name>'`, returning the bound identifier.
pub fn build_import_statement(
    binding: impl Into<ImportBinding>,
    module_name: &str,
    names: &mut UniqueNames,
) -> (Ident, ModuleItem) {
    let local = match binding.into() {
        ImportBinding::Exact(ident) => ident,
        ImportBinding::Preferred(name) => names.fresh(&name),
    };

    let import = ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local: local.clone(),
        })],
        src: Box::new(Str {
            span: DUMMY_SP,
            value: module_name.into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }));

    (local, import)
}

/// `object.property`
pub fn build_property_access(object: &Ident, property: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(Expr::Ident(object.clone())),
        prop: MemberProp::Ident(IdentName::new(property.into(), DUMMY_SP)),
    })
}

/// `callee(args...)`
pub fn build_call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
        ..Default::default()
    })
}

/// `object.property(args...)`
pub fn build_property_access_call(object: &Ident, property: &str, args: Vec<Expr>) -> Expr {
    build_call(build_property_access(object, property), args)
}

/// `object.init({ env: object.DYNAMIC_CURRENT_ENV });`
pub fn build_sdk_init_call(object: &Ident) -> Stmt {
    let config = Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: vec![PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName::new("env".into(), DUMMY_SP)),
            value: Box::new(build_property_access(object, "DYNAMIC_CURRENT_ENV")),
        })))],
    });

    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(build_property_access_call(object, "init", vec![config])),
    })
}
