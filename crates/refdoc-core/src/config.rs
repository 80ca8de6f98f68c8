use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Normalized rendering options consumed by the model layer.
///
/// Presentation hints (`hide_single_request_sample_tab`,
/// `path_in_middle_panel`) are carried verbatim for the view layer and do
/// not influence model construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefdocOptions {
    /// Insertion index for the synthetic payload sample within the
    /// operation's code-sample list. Clamped to the list bounds.
    pub payload_sample_idx: usize,

    /// Which `x-` extension fields to surface on operations and fields.
    pub show_extensions: ShowExtensions,

    /// Sort parameters and object properties by name. Wins over
    /// `required_props_first` when both are set.
    pub sort_props_alphabetically: bool,

    /// Stable-partition required parameters/properties before optional ones.
    pub required_props_first: bool,

    pub hide_single_request_sample_tab: bool,

    pub path_in_middle_panel: bool,

    /// Whether a broken operation aborts the load or is skipped with a warning.
    pub load_mode: LoadMode,

    /// The URL the document was retrieved from; relative server URLs are
    /// normalized against it.
    pub spec_url: Option<String>,
}

impl Default for RefdocOptions {
    fn default() -> Self {
        Self {
            payload_sample_idx: 0,
            show_extensions: ShowExtensions::None,
            sort_props_alphabetically: false,
            required_props_first: false,
            hide_single_request_sample_tab: false,
            path_in_middle_panel: false,
            load_mode: LoadMode::Strict,
            spec_url: None,
        }
    }
}

/// Error-propagation policy for document loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// The first operation that fails to materialize fails the whole load.
    #[default]
    Strict,
    /// Broken operations are dropped from their group and logged.
    BestEffort,
}

/// Extension-surfacing policy: off, everything, or an explicit key list.
///
/// Deserializes from a bool (`true` = all) or a list of extension names,
/// matching the option's shape in rendering configs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ShowExtensionsRepr")]
pub enum ShowExtensions {
    #[default]
    None,
    All,
    Only(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShowExtensionsRepr {
    Flag(bool),
    Keys(Vec<String>),
}

impl From<ShowExtensionsRepr> for ShowExtensions {
    fn from(repr: ShowExtensionsRepr) -> Self {
        match repr {
            ShowExtensionsRepr::Flag(true) => ShowExtensions::All,
            ShowExtensionsRepr::Flag(false) => ShowExtensions::None,
            ShowExtensionsRepr::Keys(keys) => ShowExtensions::Only(keys),
        }
    }
}

impl ShowExtensions {
    /// Whether the given member key should be surfaced as an extension.
    pub fn admits(&self, key: &str) -> bool {
        if !key.starts_with("x-") {
            return false;
        }
        match self {
            ShowExtensions::None => false,
            ShowExtensions::All => true,
            ShowExtensions::Only(keys) => keys.iter().any(|k| k == key || format!("x-{k}") == key),
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, ShowExtensions::None)
    }
}

/// Load options from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_options(path: &Path) -> Result<Option<RefdocOptions>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read options {}: {}", path.display(), e))?;
    let options: RefdocOptions = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse options {}: {}", path.display(), e))?;
    Ok(Some(options))
}
