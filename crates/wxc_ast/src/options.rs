use serde::{Deserialize, Serialize};

/// Options controlling entry synthesis.
///
/// Every field is optional in serialized form; missing keys take the
/// platform defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerOptions {
    /// Name of the exported entry function the runtime invokes.
    #[serde(default = "default_export_name")]
    pub export_name: String,
    /// Name of the entry function's payload parameter.
    #[serde(default = "default_first_param_name")]
    pub first_param_name: String,
    /// Name of the runtime's second positional argument. Not used when
    /// synthesizing; kept so configs written for the runtime round-trip.
    #[serde(default = "default_second_param_name")]
    pub second_param_name: String,
    /// Module specifier of the platform SDK.
    #[serde(default = "default_sdk_module_name")]
    pub sdk_module_name: String,
    /// Preferred local name when the SDK import has to be added.
    #[serde(default = "default_sdk_binding_name")]
    pub sdk_binding_name: String,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        Self {
            export_name: default_export_name(),
            first_param_name: default_first_param_name(),
            second_param_name: default_second_param_name(),
            sdk_module_name: default_sdk_module_name(),
            sdk_binding_name: default_sdk_binding_name(),
        }
    }
}

fn default_export_name() -> String {
    "main".into()
}

fn default_first_param_name() -> String {
    "event".into()
}

fn default_second_param_name() -> String {
    "context".into()
}

fn default_sdk_module_name() -> String {
    "wx-server-sdk".into()
}

fn default_sdk_binding_name() -> String {
    "cloud".into()
}
