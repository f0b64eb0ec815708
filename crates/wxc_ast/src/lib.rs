//! ECMAScript/TypeScript AST vocabulary for cloud-function entry synthesis.
//!
//! Re-exports the standard SWC AST and adds the views the transform works in:
//! - [`FunctionLike`]: the three shapes a user function may take
//! - [`Modifier`]: the `export`/`default`/`async`/`declare` modifier list
//!   that SWC encodes structurally
//! - [`NodeRef`]/[`Node`]: the node kinds the tree search inspects
//! - [`TransformerOptions`] and [`EntryEvent`]

pub use swc_ecma_ast::*;

mod event;
mod options;

pub use event::EntryEvent;
pub use options::TransformerOptions;

/// Declaration modifiers.
///
/// SWC wraps exported declarations in `ModuleDecl` nodes and keeps `async`
/// and `declare` as flags; this enum gives them back a uniform list form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Export,
    Default,
    Async,
    Declare,
}

/// A function the user may nominate as the cloud-function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunctionLike<'a> {
    /// `(a, b) => {}` / `async (a, b) => {}`
    Arrow(&'a ArrowExpr),
    /// `function (a, b) {}` / `function named(a, b) {}` in expression position,
    /// also the anonymous `export default function (a, b) {}`.
    Expr(&'a FnExpr),
    /// `function sum(a, b) {}`
    Decl(&'a FnDecl),
}

impl<'a> FunctionLike<'a> {
    /// Returns the function behind `expr` if it is an arrow or function expression.
    pub fn from_expr(expr: &'a Expr) -> Option<Self> {
        match expr {
            Expr::Arrow(arrow) => Some(FunctionLike::Arrow(arrow)),
            Expr::Fn(fn_expr) => Some(FunctionLike::Expr(fn_expr)),
            _ => None,
        }
    }

    /// Parameter patterns in declaration order.
    pub fn params(&self) -> Vec<&'a Pat> {
        match *self {
            FunctionLike::Arrow(arrow) => arrow.params.iter().collect(),
            FunctionLike::Expr(fn_expr) => fn_expr.function.params.iter().map(|p| &p.pat).collect(),
            FunctionLike::Decl(fn_decl) => fn_decl.function.params.iter().map(|p| &p.pat).collect(),
        }
    }

    /// Source names of the positional parameters, in declaration order.
    ///
    /// Plain identifiers and identifiers with a default value are accepted.
    /// A TypeScript `this` parameter is not positional and is skipped.
    /// Returns `None` if any parameter is a destructuring or rest pattern.
    pub fn param_names(&self) -> Option<Vec<String>> {
        let is_arrow = matches!(self, FunctionLike::Arrow(_));
        let mut names = Vec::new();
        for pat in self.params() {
            let ident = match pat {
                Pat::Ident(binding) => &binding.id,
                Pat::Assign(assign) => match &*assign.left {
                    Pat::Ident(binding) => &binding.id,
                    _ => return None,
                },
                _ => return None,
            };
            if !is_arrow && ident.sym.as_str() == "this" {
                continue;
            }
            names.push(ident.sym.to_string());
        }
        Some(names)
    }

    /// Short description for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FunctionLike::Arrow(_) => "arrow function",
            FunctionLike::Expr(_) => "function expression",
            FunctionLike::Decl(_) => "function declaration",
        }
    }
}

/// A borrowed node visited by the tree search.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Expr(&'a Expr),
    Pat(&'a Pat),
    Ident(&'a Ident),
}

impl NodeRef<'_> {
    pub fn to_node(self) -> Node {
        match self {
            NodeRef::Expr(expr) => Node::Expr(Box::new(expr.clone())),
            NodeRef::Pat(pat) => Node::Pat(Box::new(pat.clone())),
            NodeRef::Ident(ident) => Node::Ident(ident.clone()),
        }
    }
}

/// An owned copy of a node returned by the tree search.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expr(Box<Expr>),
    Pat(Box<Pat>),
    Ident(Ident),
}

impl Node {
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Node::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Node::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}
