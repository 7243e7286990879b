//! Icon and color resolution.
//!
//! Form → base template, supplied colors → validated four-slot palette,
//! slot substitution, then a base64 `data:` URI.

mod manifest;
pub mod palette;
mod substitute;
mod templates;

pub use manifest::*;
pub use substitute::*;
pub use templates::*;

use base64::Engine as _;
use thiserror::Error;

use crate::models::{DrugForm, IconColorInput, IconColors, ResolvedIcon};

use palette::is_valid_hex;

/// Prefix of every serialized icon.
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Icon errors. Both are deployment defects, not per-request problems.
#[derive(Error, Debug, PartialEq)]
pub enum IconError {
    #[error("No icon template for form '{0}' and no generic fallback")]
    UnknownForm(String),

    #[error("Malformed icon template: {0}")]
    MalformedTemplate(String),
}

pub type IconResult<T> = Result<T, IconError>;

/// Resolves icons against a template store and color manifest.
#[derive(Debug, Clone)]
pub struct IconResolver {
    templates: TemplateStore,
    manifest: ColorManifest,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IconResolver {
    /// Resolver over the built-in templates and manifest.
    pub fn new() -> Self {
        Self::with_parts(TemplateStore::builtin(), ColorManifest::builtin())
    }

    pub fn with_parts(templates: TemplateStore, manifest: ColorManifest) -> Self {
        Self { templates, manifest }
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn manifest(&self) -> &ColorManifest {
        &self.manifest
    }

    /// Validate supplied colors slot by slot; anything missing or not strict
    /// hex takes the manifest default for the form.
    pub fn resolve_colors(&self, form: DrugForm, supplied: Option<&IconColorInput>) -> IconColors {
        let defaults = self.manifest.palette_for(form);
        let supplied = supplied.cloned().unwrap_or_default();

        IconColors {
            background: pick("background", supplied.background, &defaults.background),
            ascent1: pick("ascent1", supplied.ascent1, &defaults.ascent1),
            ascent2: pick("ascent2", supplied.ascent2, &defaults.ascent2),
            cap: pick("cap", supplied.cap, &defaults.cap),
        }
    }

    /// Full icon for a form and optional supplied colors.
    pub fn resolve_icon(
        &self,
        form: DrugForm,
        supplied: Option<&IconColorInput>,
    ) -> IconResult<ResolvedIcon> {
        let template = self.templates.lookup(form)?;
        let icon_colors = self.resolve_colors(form, supplied);

        let svg = substitute_slots(&template.svg, &icon_colors);
        validate_output(&svg, &icon_colors)?;

        tracing::debug!(%form, template = %template.key, "icon resolved");

        Ok(ResolvedIcon {
            medication_color: icon_colors.ascent1.clone(),
            background_color: icon_colors.background.clone(),
            icon_svg: encode_svg(&svg),
            icon_colors,
        })
    }
}

/// Serialize SVG markup as a self-contained data URI.
pub fn encode_svg(svg: &str) -> String {
    format!(
        "{}{}",
        SVG_DATA_URI_PREFIX,
        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

/// Decode a data URI produced by [`encode_svg`].
pub fn decode_svg(uri: &str) -> Option<String> {
    let payload = uri.strip_prefix(SVG_DATA_URI_PREFIX)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    String::from_utf8(bytes).ok()
}

fn pick(slot: &str, supplied: Option<String>, default: &str) -> String {
    match supplied {
        Some(color) if is_valid_hex(&color) => color,
        Some(color) => {
            tracing::warn!(slot, color = %color, "invalid icon color, using default");
            default.to_string()
        }
        None => default.to_string(),
    }
}
