//! Cloud-function entry synthesis.
//!
//! Rewrites the top level of a module so the function-as-a-service runtime
//! finds an `export async function main(event)` entry:
//! - `export default (a, b) => {}` → `const default_1 = …` + wrapper
//! - `export default sum`          → wrapper calling `sum`
//! - `export default function …`   → plain declaration + wrapper
//! - `export const main = …`       → left as is
//!
//! Every rewrite also makes sure the platform SDK is imported and
//! initialized exactly once.

pub mod build;
pub mod error;
pub mod names;
pub mod query;
pub mod recognize;
pub mod synthesize;
pub mod transformer;

pub use error::BuildError;
pub use recognize::{recognize, EntryShape};
pub use transformer::{EntrySink, Transformer};
pub use wxc_ast::{EntryEvent, TransformerOptions};
