//! Base icon templates.
//!
//! A template is plain SVG in which every recolorable element carries a
//! `data-slot="<slot>"` attribute. Nothing else about the markup is assumed.

use std::collections::HashMap;

use crate::models::DrugForm;

use super::{IconError, IconResult};

/// A read-only base icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconTemplate {
    /// Template name, e.g. "tablet" or "pill"
    pub key: String,
    /// SVG markup with `data-slot` substitution points
    pub svg: String,
}

impl IconTemplate {
    pub fn new(key: impl Into<String>, svg: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            svg: svg.into(),
        }
    }
}

/// Form → template lookup with a generic fallback.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    by_form: HashMap<DrugForm, IconTemplate>,
    generic: Option<IconTemplate>,
}

impl TemplateStore {
    /// Empty store, no generic fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the built-in template set.
    pub fn builtin() -> Self {
        let mut store = Self::new();
        store.insert(DrugForm::Tablet, IconTemplate::new("tablet", TABLET_SVG));
        store.insert(DrugForm::Capsule, IconTemplate::new("capsule", CAPSULE_SVG));
        store.insert(DrugForm::Syrup, IconTemplate::new("syrup", SYRUP_SVG));
        store.insert(DrugForm::Injection, IconTemplate::new("injection", INJECTION_SVG));
        store.insert(DrugForm::Drop, IconTemplate::new("drop", DROP_SVG));
        store.insert(DrugForm::Inhaler, IconTemplate::new("inhaler", INHALER_SVG));
        store.set_generic(IconTemplate::new("pill", PILL_SVG));
        store
    }

    /// Register (or replace) the template for a form.
    pub fn insert(&mut self, form: DrugForm, template: IconTemplate) {
        self.by_form.insert(form, template);
    }

    /// Set the fallback used for forms without a template.
    pub fn set_generic(&mut self, template: IconTemplate) {
        self.generic = Some(template);
    }

    /// The generic fallback, if configured.
    pub fn generic(&self) -> Option<&IconTemplate> {
        self.generic.as_ref()
    }

    /// Template for a form, falling back to the generic template.
    pub fn lookup(&self, form: DrugForm) -> IconResult<&IconTemplate> {
        self.by_form
            .get(&form)
            .or(self.generic.as_ref())
            .ok_or_else(|| IconError::UnknownForm(form.to_string()))
    }
}

const TABLET_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-2.4 -2.4 28.8 28.8">
  <defs>
    <clipPath id="tablet-clip-top-left"><polygon points="0,0 0,24 24,24" /></clipPath>
    <clipPath id="tablet-clip-bottom-right"><polygon points="0,0 24,0 24,24" /></clipPath>
  </defs>
  <rect data-slot="background" x="-2.4" y="-2.4" width="28.8" height="28.8" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g clip-path="url(#tablet-clip-top-left)">
    <circle data-slot="ascent2" cx="12" cy="12" r="9" fill="#d6d6d6" fill-opacity="0.95" />
  </g>
  <g clip-path="url(#tablet-clip-bottom-right)">
    <circle data-slot="ascent1" cx="12" cy="12" r="9" fill="#ffffff" fill-opacity="0.95" />
  </g>
  <circle cx="12" cy="12" r="9" fill="none" stroke="#111827" stroke-width="0.5" />
  <line x1="5.64" y1="5.64" x2="18.36" y2="18.36" stroke="#111827" stroke-width="0.5" stroke-linecap="round" />
</svg>"##;

const CAPSULE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <defs>
    <clipPath id="capsule-clip-top-left"><polygon points="0,0 0,24 24,24" /></clipPath>
    <clipPath id="capsule-clip-bottom-right"><polygon points="0,0 24,0 24,24" /></clipPath>
  </defs>
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g clip-path="url(#capsule-clip-top-left)">
    <path data-slot="ascent2" d="m10.5 20.5 10 -10a4.95 4.95 0 1 0 -7 -7l-10 10a4.95 4.95 0 1 0 7 7Z" fill="#d6d6d6" fill-opacity="0.95" />
  </g>
  <g clip-path="url(#capsule-clip-bottom-right)">
    <path data-slot="ascent1" d="m10.5 20.5 10 -10a4.95 4.95 0 1 0 -7 -7l-10 10a4.95 4.95 0 1 0 7 7Z" fill="#ffffff" fill-opacity="0.95" />
  </g>
  <path d="m10.5 20.5 10 -10a4.95 4.95 0 1 0 -7 -7l-10 10a4.95 4.95 0 1 0 7 7Z" fill="none" stroke="#000000" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.5" />
  <path d="m8.5 8.5 7 7" fill="none" stroke="#000000" stroke-linecap="round" stroke-width="0.5" />
</svg>"##;

const SYRUP_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <defs>
    <clipPath id="syrup-body-clip"><path d="M12.466 32.724h12.466a1.558 1.558 0 0 0 1.558 -1.558V15.583a4.674 4.674 0 0 0 -4.674 -4.674h-6.233a4.674 4.674 0 0 0 -4.674 4.674v15.583a1.558 1.558 0 0 0 1.558 1.558z" /></clipPath>
    <clipPath id="syrup-cap-clip"><path d="M15.58 6.48a1.56 1.56 0 0 1 1.56 -1.56H20.25a1.56 1.56 0 0 1 1.56 1.56V10.91H15.58Z" /></clipPath>
  </defs>
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g transform="translate(12,12) scale(0.83125) translate(-18.7,-18.7)">
    <g clip-path="url(#syrup-body-clip)">
      <rect data-slot="ascent1" x="-0.5" y="-6.26" width="76.8" height="44.16" fill="#ffffff" fill-opacity="0.95" />
      <rect data-slot="ascent2" x="-0.5" y="25" width="76.8" height="12" fill="#d6d6d6" fill-opacity="0.95" />
    </g>
    <g clip-path="url(#syrup-cap-clip)">
      <rect data-slot="cap" x="-0.5" y="-6.26" width="76.8" height="44.16" fill="#e37b35" fill-opacity="0.95" />
    </g>
    <g fill="none" stroke="#000000" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.5">
      <path d="M12.466 32.724h12.466a1.558 1.558 0 0 0 1.558 -1.558V15.583a4.674 4.674 0 0 0 -4.674 -4.674h-6.233a4.674 4.674 0 0 0 -4.674 4.674v15.583a1.558 1.558 0 0 0 1.558 1.558z" />
      <path d="M15.583 21.816h6.233" />
      <path d="M18.699 18.699v6.233" />
      <path d="M15.583 10.908V6.233a1.558 1.558 0 0 1 1.558 -1.558h3.116a1.558 1.558 0 0 1 1.558 1.558v4.674" />
    </g>
  </g>
</svg>"##;

const INJECTION_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g transform="translate(12,12) scale(1.330) translate(-11.28,-12)" stroke="#000000" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.5">
    <path data-slot="ascent1" d="M18.2 8.625 8.337 18.495c-0.958 0.958 -2.395 0.958 -3.258 0l-0.575 -0.575c-0.958 -0.958 -0.95 -2.395 0 -3.258L14.375 4.791Z" fill="#ffffff" fill-opacity="0.95" />
    <path data-slot="cap" d="m17.25 1.91 3.83 3.83 -1.2 1.2 -3.83 -3.83Z" fill="#7dd3fc" fill-opacity="0.95" />
    <path d="m10.58 12.3 8.4 -8.4" fill="none" />
    <path d="m8.625 10.54 3.833 3.833" fill="none" />
    <path d="m4.791 18.208 -2.875 2.875" fill="none" />
    <path d="m13.416 3.833 5.75 5.75" fill="none" />
  </g>
</svg>"##;

const DROP_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <defs>
    <clipPath id="drops-bottle-clip"><path d="m8.009 9.879 -1.87 4.67v5.61a1.87 1.87 0 0 0 1.87 1.87h7.48a1.87 1.87 0 0 0 1.87 -1.87v-5.61l-1.87 -4.67" /></clipPath>
    <clipPath id="drops-cap-clip"><path d="M13.62 3.828v-0.489A1.87 1.87 0 0 0 11.75 1.468a1.87 1.87 0 0 0 -1.87 1.87v0.489a1.958 1.958 0 0 1 -0.195 0.842l-0.734 1.468h5.6l-0.734 -1.468a1.958 1.958 0 0 1 -0.195 -0.842Z" /></clipPath>
    <clipPath id="drops-label-clip"><path d="M7.079 6.139h9.351v3.74H7.079Z" /></clipPath>
    <clipPath id="drops-drop-clip"><path d="M13.62 16.538a1.87 1.87 0 0 1 -3.74 0c0 -1.635 1.87 -3.035 1.87 -3.035s1.87 1.4 1.87 3.035Z" /></clipPath>
  </defs>
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g transform="translate(12,12) scale(1.119) translate(-12,-12)" fill="none" stroke="#000000" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.5">
    <g clip-path="url(#drops-cap-clip)"><rect data-slot="cap" x="0" y="0" width="24" height="8" fill="#fafbfc" fill-opacity="0.95" /></g>
    <g clip-path="url(#drops-bottle-clip)"><rect data-slot="ascent1" x="0" y="0" width="24" height="24" fill="#fafbfc" fill-opacity="0.95" /></g>
    <g clip-path="url(#drops-label-clip)"><rect data-slot="ascent2" x="0" y="0" width="24" height="24" fill="#fafbfc" fill-opacity="0.95" /></g>
    <g clip-path="url(#drops-drop-clip)"><rect x="0" y="0" width="24" height="24" fill="#009dff" fill-opacity="0.95" /></g>
    <path d="m8.009 9.879 -1.87 4.67v5.61a1.87 1.87 0 0 0 1.87 1.87h7.48a1.87 1.87 0 0 0 1.87 -1.87v-5.61l-1.87 -4.67" />
    <path d="M13.62 16.538a1.87 1.87 0 0 1 -3.74 0c0 -1.635 1.87 -3.035 1.87 -3.035s1.87 1.4 1.87 3.035Z" />
    <path d="M7.079 6.139h9.351v3.74H7.079Z" />
    <path d="M13.62 3.828v-0.489A1.87 1.87 0 0 0 11.75 1.468a1.87 1.87 0 0 0 -1.87 1.87v0.489a1.958 1.958 0 0 1 -0.195 0.842l-0.734 1.468h5.6l-0.734 -1.468a1.958 1.958 0 0 1 -0.195 -0.842Z" />
  </g>
</svg>"##;

const INHALER_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g stroke="#000000" stroke-linejoin="round" stroke-width="0.5">
    <path data-slot="cap" d="M5 2.5h6.5l1 7.5H6Z" fill="#7dd3fc" fill-opacity="0.95" />
    <path data-slot="ascent1" d="M6 10h6.5l1.5 11.5H7.5Z" fill="#ffffff" fill-opacity="0.95" />
    <path data-slot="ascent2" d="M13.8 15.5h5.2a1.5 1.5 0 0 1 1.5 1.5v3a1.5 1.5 0 0 1 -1.5 1.5h-5.2Z" fill="#d6d6d6" fill-opacity="0.95" />
    <path d="M8 17.5h4M8 19h4" fill="none" stroke-linecap="round" />
  </g>
</svg>"##;

const PILL_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="-7.2 -7.2 38.4 38.4">
  <defs>
    <clipPath id="pill-clip-left"><rect x="0" y="0" width="12" height="24" /></clipPath>
    <clipPath id="pill-clip-right"><rect x="12" y="0" width="12" height="24" /></clipPath>
  </defs>
  <rect data-slot="background" x="-7.2" y="-7.2" width="38.4" height="38.4" rx="2" ry="2" fill="#009dff" fill-opacity="1" stroke-width="0" />
  <g clip-path="url(#pill-clip-left)">
    <rect data-slot="ascent1" x="2" y="7" width="20" height="10" rx="5" ry="5" fill="#ffffff" fill-opacity="0.95" />
  </g>
  <g clip-path="url(#pill-clip-right)">
    <rect data-slot="ascent2" x="2" y="7" width="20" height="10" rx="5" ry="5" fill="#d6d6d6" fill-opacity="0.95" />
  </g>
  <rect x="2" y="7" width="20" height="10" rx="5" ry="5" fill="none" stroke="#000000" stroke-width="0.5" />
  <line x1="12" y1="7" x2="12" y2="17" stroke="#000000" stroke-width="0.5" />
</svg>"##;
