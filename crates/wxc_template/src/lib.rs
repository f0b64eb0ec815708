//! Client-side call stubs for cloud functions.
//!
//! Given the functions found while transforming, renders a TypeScript module
//! that wraps each one in a `wx.cloud.callFunction` call, typed after the
//! function's own signature:
//!
//! ```text
//! import type functionSum from '@cloud/functions/sum'
//! export const cloudSum: PromiseReturnType<typeof functionSum> = (a, b) => { ... }
//! export default { sum: cloudSum }
//! ```

use serde::{Deserialize, Serialize};
use wxc_ast::EntryEvent;

/// Import path prefix under which cloud functions are resolvable.
pub const FUNCTIONS_MODULE_PREFIX: &str = "@cloud/functions/";

const PROMISE_TYPE: &str = "type PromiseType<T> = T extends Promise<infer _> ? T : Promise<T>";

const PROMISE_RETURN_TYPE: &str = "type PromiseReturnType<T extends (...args: any) => any> = \
     (...args: Parameters<T>) => PromiseType<ReturnType<T>>";

/// A cloud function and the payload properties it takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionItem {
    pub name: String,
    pub params: Vec<String>,
}

impl FunctionItem {
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_entry(name: impl Into<String>, event: &EntryEvent) -> Self {
        Self::new(name, event.param_names.iter().cloned())
    }
}

/// Upper-case the first character: `someName` → `SomeName`.
pub fn ucfirst(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Arrow-function parameter list: `[a]` → `a`, `[a, b]` → `(a, b)`.
///
/// With `arrow_parens` a single parameter is parenthesized too.
pub fn params_literal<S: AsRef<str>>(params: &[S], arrow_parens: bool) -> String {
    match params {
        [single] if !arrow_parens => single.as_ref().to_string(),
        _ => format!("({})", join(params, ", ")),
    }
}

/// Shorthand object literal: `[a, b]` → `{ a, b }`, `[]` → `{}`.
pub fn object_literal<S: AsRef<str>>(params: &[S]) -> String {
    if params.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", join(params, ", "))
    }
}

fn join<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    items.iter().map(|item| item.as_ref()).collect::<Vec<&str>>().join(separator)
}

/// Render the client stub module for `functions`.
pub fn render_client_stubs(functions: &[FunctionItem]) -> String {
    let mut sections = Vec::new();

    if !functions.is_empty() {
        let imports: Vec<_> = functions
            .iter()
            .map(|function| {
                format!(
                    "import type function{} from '{FUNCTIONS_MODULE_PREFIX}{}'",
                    ucfirst(&function.name),
                    function.name
                )
            })
            .collect();
        sections.push(imports.join("\n"));
    }

    sections.push(PROMISE_TYPE.to_string());
    sections.push(PROMISE_RETURN_TYPE.to_string());

    for function in functions {
        let title = ucfirst(&function.name);
        sections.push(format!(
            "export const cloud{title}: PromiseReturnType<typeof function{title}> = \
             {params} => {{\n  \
             return wx.cloud.callFunction({{ name: '{name}', data: {data} }})\
             .then(res => res.result as any)\n\
             }}",
            params = params_literal(&function.params, false),
            name = function.name,
            data = object_literal(&function.params),
        ));
    }

    if functions.is_empty() {
        sections.push("export default {}".to_string());
    } else {
        let entries: Vec<_> = functions
            .iter()
            .map(|function| format!("  {}: cloud{}", function.name, ucfirst(&function.name)))
            .collect();
        sections.push(format!("export default {{\n{}\n}}", entries.join(",\n")));
    }

    sections.join("\n\n")
}
