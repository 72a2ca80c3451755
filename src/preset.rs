//! Preset schema and I/O.
//!
//! A preset captures the grammar and the model parameters as JSON:
//!
//! ```json
//! {
//!   "l-system": { "axiom": "F", "rules": ["F:F[+F]F"], "iterations": "3" },
//!   "model-param": { "initAngle": "0", "rotAngle": "25", "nrSides": "8" }
//! }
//! ```
//!
//! Values are text and go through the same parse/clamp setters as user
//! input; plain JSON numbers are accepted too. Missing fields keep their
//! current value. Any field this schema does not know makes the whole file
//! invalid, and nothing is applied.

use crate::error::{PresetError, PresetResult};
use crate::grammar::Grammar;
use crate::params::ModelParams;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::fs;
use std::path::Path;

/// A single preset value: text, or a bare JSON number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetValue {
    Text(String),
    Number(serde_json::Number),
}

impl PresetValue {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Grammar section (`"l-system"`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LSystemSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axiom: Option<String>,

    /// One entry per rule line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<PresetValue>,
}

/// Model parameter section (`"model-param"`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ModelSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_angle: Option<PresetValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot_angle: Option<PresetValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_angle: Option<PresetValue>,

    #[serde(rename = "nrSides", default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<PresetValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_length: Option<PresetValue>,

    #[serde(
        rename = "cutLengthFactor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cut_len_factor: Option<PresetValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_thickness: Option<PresetValue>,

    #[serde(
        rename = "cutThicknessFactor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cut_thi_factor: Option<PresetValue>,
}

/// A saved grammar plus model parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    #[serde(rename = "l-system", default)]
    pub lsystem: LSystemSection,

    #[serde(rename = "model-param", default)]
    pub model: ModelSection,
}

fn text(value: impl ToString) -> Option<PresetValue> {
    Some(PresetValue::Text(value.to_string()))
}

impl Preset {
    /// Snapshot of the current grammar and parameters.
    pub fn capture(grammar: &Grammar, params: &ModelParams) -> Self {
        Self {
            lsystem: LSystemSection {
                axiom: Some(grammar.axiom.clone()),
                rules: Some(grammar.rule_lines()),
                iterations: text(grammar.iterations()),
            },
            model: ModelSection {
                init_angle: text(params.init_angle),
                rot_angle: text(params.rot_angle),
                dev_angle: text(params.dev_angle),
                sides: text(params.sides),
                segment_length: text(params.segment_length),
                cut_len_factor: text(params.cut_len_factor),
                segment_thickness: text(params.segment_thickness),
                cut_thi_factor: text(params.cut_thi_factor),
            },
        }
    }

    /// Writes every present field through the textual setters.
    pub fn apply(&self, grammar: &mut Grammar, params: &mut ModelParams) {
        let ls = &self.lsystem;
        if let Some(axiom) = &ls.axiom {
            grammar.axiom = axiom.clone();
        }
        if let Some(rules) = &ls.rules {
            grammar.rules = rules.join("\n");
        }
        if let Some(v) = &ls.iterations {
            grammar.set_iterations_str(&v.as_text());
        }

        let m = &self.model;
        let setters: [(&Option<PresetValue>, fn(&mut ModelParams, &str)); 8] = [
            (&m.init_angle, ModelParams::set_init_angle_str),
            (&m.rot_angle, ModelParams::set_rot_angle_str),
            (&m.dev_angle, ModelParams::set_dev_angle_str),
            (&m.sides, ModelParams::set_sides_str),
            (&m.segment_length, ModelParams::set_segment_length_str),
            (&m.cut_len_factor, ModelParams::set_cut_len_factor_str),
            (&m.segment_thickness, ModelParams::set_segment_thickness_str),
            (&m.cut_thi_factor, ModelParams::set_cut_thi_factor_str),
        ];
        for (value, set) in setters {
            if let Some(v) = value {
                set(params, &v.as_text());
            }
        }
    }

    /// Parses preset JSON. Unknown fields are reported as
    /// [`PresetError::Invalid`].
    pub fn from_json(json: &str) -> PresetResult<Self> {
        serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => PresetError::Invalid(e.to_string()),
            _ => PresetError::Json(e),
        })
    }

    pub fn to_json(&self) -> PresetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> PresetResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> PresetResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
