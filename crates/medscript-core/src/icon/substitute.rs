//! Slot substitution over SVG markup.
//!
//! Works on start tags only: any element with a `data-slot` attribute gets its
//! `fill` set to the slot's color. Geometry and every other attribute pass
//! through byte for byte.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::IconColors;

use super::{IconError, IconResult};

static START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][^<>]*>").expect("valid regex"));

static SLOT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\sdata-slot\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

static FILL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\sfill\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// A substitution point found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPoint {
    pub slot: String,
    /// Current fill, if the element has one
    pub fill: Option<String>,
}

/// Recolor every slot point in `svg`.
pub fn substitute_slots(svg: &str, colors: &IconColors) -> String {
    START_TAG
        .replace_all(svg, |caps: &Captures| {
            let tag = &caps[0];
            let Some(slot) = slot_name(tag) else {
                return tag.to_string();
            };
            match colors.get(slot) {
                Some(color) => recolor_tag(tag, color),
                None => {
                    tracing::warn!(slot, "unknown icon slot left untouched");
                    tag.to_string()
                }
            }
        })
        .into_owned()
}

/// Every substitution point in document order.
pub fn slot_points(svg: &str) -> Vec<SlotPoint> {
    START_TAG
        .find_iter(svg)
        .filter_map(|m| {
            let tag = m.as_str();
            slot_name(tag).map(|slot| SlotPoint {
                slot: slot.to_string(),
                fill: fill_value(tag).map(str::to_string),
            })
        })
        .collect()
}

/// Check a recolored icon: an `<svg` root is present and every known slot
/// point carries its resolved color.
pub fn validate_output(svg: &str, colors: &IconColors) -> IconResult<()> {
    if !svg.contains("<svg") {
        return Err(IconError::MalformedTemplate("missing <svg> root".into()));
    }

    for point in slot_points(svg) {
        let Some(expected) = colors.get(&point.slot) else {
            continue;
        };
        if point.fill.as_deref() != Some(expected) {
            return Err(IconError::MalformedTemplate(format!(
                "slot {} has fill {:?}, expected {}",
                point.slot, point.fill, expected
            )));
        }
    }
    Ok(())
}

fn slot_name(tag: &str) -> Option<&str> {
    let caps = SLOT_ATTR.captures(tag)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

fn fill_value(tag: &str) -> Option<&str> {
    let caps = FILL_ATTR.captures(tag)?;
    caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
}

fn recolor_tag(tag: &str, color: &str) -> String {
    if FILL_ATTR.is_match(tag) {
        return FILL_ATTR
            .replace(tag, |caps: &Captures| format!("{}\"{}\"", &caps[1], color))
            .into_owned();
    }

    // No fill yet: insert one right after the element name.
    let name_end = tag[1..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map(|i| i + 1)
        .unwrap_or(tag.len());
    format!("{} fill=\"{}\"{}", &tag[..name_end], color, &tag[name_end..])
}
