//! Default slot colors per form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{DrugForm, IconColors};

/// Global fallback palette plus per-form overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorManifest {
    #[serde(default = "default_palette")]
    pub global: IconColors,
    #[serde(default)]
    pub per_form: HashMap<DrugForm, IconColors>,
}

/// Neutral palette: grey background, white body, light grey shade, sky cap.
pub fn default_palette() -> IconColors {
    IconColors {
        background: "#B8B8B8".into(),
        ascent1: "#FFFFFF".into(),
        ascent2: "#D6D6D6".into(),
        cap: "#7DD3FC".into(),
    }
}

impl Default for ColorManifest {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ColorManifest {
    /// Built-in palettes.
    pub fn builtin() -> Self {
        let mut per_form = HashMap::new();
        per_form.insert(
            DrugForm::Syrup,
            IconColors {
                cap: "#E37B35".into(),
                ..default_palette()
            },
        );
        Self {
            global: default_palette(),
            per_form,
        }
    }

    /// Load a manifest from JSON.
    ///
    /// ```json
    /// {"global": {"background": "#B8B8B8", ...}, "per_form": {"syrup": {...}}}
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register a per-form palette.
    pub fn set_palette(&mut self, form: DrugForm, palette: IconColors) {
        self.per_form.insert(form, palette);
    }

    /// Palette for a form, or the global palette.
    pub fn palette_for(&self, form: DrugForm) -> &IconColors {
        self.per_form.get(&form).unwrap_or(&self.global)
    }
}
