//! The top-level rewrite pass.

use tracing::{debug, trace, warn};
use wxc_ast::*;

use crate::recognize::{recognize, EntryShape};
use crate::synthesize::Synthesizer;

/// Receives entry events as the transform finds them.
pub trait EntrySink {
    fn entry_found(&mut self, event: EntryEvent);
}

impl<F> EntrySink for F
where
    F: FnMut(EntryEvent),
{
    fn entry_found(&mut self, event: EntryEvent) {
        self(event)
    }
}

/// Rewrites modules so they export a cloud-function entry.
///
/// Holds only the options; every call to [`Transformer::transform`] starts
/// from scratch, so one transformer can serve any number of modules.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformerOptions,
}

impl Transformer {
    pub fn new(options: TransformerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformerOptions {
        &self.options
    }

    /// Rewrite the top level of `module`.
    ///
    /// Each top-level statement is classified on its own and either replaced
    /// by the synthesized items or kept unchanged. Nested statements are
    /// never touched. `sink` gets one event per recognized statement, in
    /// module order.
    pub fn transform(&self, module: Module, file_path: &str, sink: &mut dyn EntrySink) -> Module {
        let mut synthesizer = Synthesizer::new(&self.options, &module, file_path);
        let mut explicit_main_found = false;
        let mut body = Vec::with_capacity(module.body.len());

        for item in &module.body {
            let shape = recognize(item, &module, &self.options, explicit_main_found);

            match synthesizer.synthesize(&shape, item, &module) {
                Ok(Some(synthesized)) => {
                    if let EntryShape::ExplicitMain { .. } = shape {
                        explicit_main_found = true;
                    }
                    body.extend(synthesized.items);
                    match synthesized.event {
                        Some(event) => {
                            debug!(
                                file = file_path,
                                shape = shape.describe(),
                                params = ?event.param_names,
                                "found entry"
                            );
                            sink.entry_found(event);
                        }
                        None => trace!(
                            file = file_path,
                            shape = shape.describe(),
                            "statement rewritten"
                        ),
                    }
                }
                Ok(None) => {
                    trace!(file = file_path, "statement left as is");
                    body.push(item.clone());
                }
                Err(err) => {
                    warn!(
                        file = file_path,
                        shape = shape.describe(),
                        "cannot synthesize entry: {err}"
                    );
                    body.push(item.clone());
                }
            }
        }

        Module { body, ..module }
    }

    /// [`Transformer::transform`], collecting the events.
    pub fn transform_collect(&self, module: Module, file_path: &str) -> (Module, Vec<EntryEvent>) {
        let mut events = Vec::new();
        let module = self.transform(module, file_path, &mut |event: EntryEvent| events.push(event));
        (module, events)
    }
}
