use serde::{Deserialize, Serialize};

/// Reported once for every top-level export recognized as a cloud-function entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryEvent {
    /// Path of the transformed source file, as given to the transformer.
    pub file_path: String,
    /// Payload property names forwarded to the user function, in order.
    pub param_names: Vec<String>,
    /// Whether the module already exported its own entry function.
    pub is_explicit_main: bool,
}
