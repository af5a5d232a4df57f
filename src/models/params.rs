//! 1-halo model parameter dispatch.
//!
//! Halo-profile parameters arrive either as a typed [`ModelParams`] value or as
//! a loose name -> value map (CLI `key=value` pairs, config files). Both paths
//! end in the same fixed-layout parameter vector:
//!
//! | schema  | vector         |
//! |---------|----------------|
//! | none    | `[]`           |
//! | NFW     | `[c]`          |
//! | Einasto | `[rs, alpha]`  |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolkitError;

/// Named halo-profile parameters.
pub type ParamSet = BTreeMap<String, f64>;

/// A validated 1-halo profile parameterisation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ModelParams {
    /// No 1-halo profile.
    #[default]
    None,
    /// Navarro–Frenk–White, concentration `c`.
    Nfw { c: f64 },
    /// Einasto, scale radius `rs` [Mpc/h] and shape `alpha`.
    Einasto { rs: f64, alpha: f64 },
}

impl ModelParams {
    /// Resolve a parameter map into a schema.
    ///
    /// Rules, in order:
    /// 1. an empty map is [`ModelParams::None`]
    /// 2. `c` present selects NFW, regardless of any other keys
    /// 3. `rs` and `alpha` both present select Einasto
    /// 4. anything else is [`ToolkitError::UnsupportedModel`]
    pub fn from_params(params: &ParamSet) -> Result<Self, ToolkitError> {
        if params.is_empty() {
            return Ok(ModelParams::None);
        }
        if let Some(&c) = params.get("c") {
            return Ok(ModelParams::Nfw { c });
        }
        if let (Some(&rs), Some(&alpha)) = (params.get("rs"), params.get("alpha")) {
            return Ok(ModelParams::Einasto { rs, alpha });
        }
        Err(ToolkitError::UnsupportedModel {
            keys: params.keys().cloned().collect(),
        })
    }

    /// Fixed-order parameter vector for this schema.
    pub fn to_vector(&self) -> Vec<f64> {
        match *self {
            ModelParams::None => Vec::new(),
            ModelParams::Nfw { c } => vec![c],
            ModelParams::Einasto { rs, alpha } => vec![rs, alpha],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelParams::None => "none",
            ModelParams::Nfw { .. } => "NFW",
            ModelParams::Einasto { .. } => "Einasto",
        }
    }
}

impl fmt::Display for ModelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelParams::None => write!(f, "none"),
            ModelParams::Nfw { c } => write!(f, "NFW(c={c})"),
            ModelParams::Einasto { rs, alpha } => write!(f, "Einasto(rs={rs}, alpha={alpha})"),
        }
    }
}

/// Map named parameters to the model vector.
///
/// `None` and an empty map both produce an empty vector.
pub fn dispatch(params: Option<&ParamSet>) -> Result<Vec<f64>, ToolkitError> {
    match params {
        None => Ok(Vec::new()),
        Some(p) => ModelParams::from_params(p).map(|m| m.to_vector()),
    }
}

/// A single `name=value` pair, as accepted on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParam {
    pub name: String,
    pub value: f64,
}

impl FromStr for NamedParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing parameter name in '{s}'"));
        }
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid value for '{name}': {e}"))?;
        Ok(NamedParam {
            name: name.to_string(),
            value,
        })
    }
}

/// Collect CLI pairs into a [`ParamSet`]. Later duplicates win.
pub fn collect_params(pairs: &[NamedParam]) -> ParamSet {
    pairs
        .iter()
        .map(|p| (p.name.clone(), p.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> ParamSet {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_or_absent_params_give_empty_vector() {
        assert!(dispatch(None).unwrap().is_empty());
        assert!(dispatch(Some(&ParamSet::new())).unwrap().is_empty());
    }

    #[test]
    fn nfw_concentration() {
        assert_eq!(dispatch(Some(&params(&[("c", 5.0)]))).unwrap(), vec![5.0]);
    }

    #[test]
    fn einasto_keeps_rs_alpha_order() {
        let out = dispatch(Some(&params(&[("alpha", 0.2), ("rs", 0.1)]))).unwrap();
        assert_eq!(out, vec![0.1, 0.2]);
        assert_eq!(
            dispatch(Some(&params(&[("rs", 0.1), ("alpha", 0.1)]))).unwrap(),
            vec![0.1, 0.1]
        );
    }

    #[test]
    fn unknown_keys_are_rejected_with_their_names() {
        let err = dispatch(Some(&params(&[("eggs", 12.0), ("bacon", 6.0)]))).unwrap_err();
        assert!(matches!(err, ToolkitError::UnsupportedModel { .. }));
        let msg = err.to_string();
        assert!(msg.contains("eggs"));
        assert!(msg.contains("bacon"));
        assert!(msg.contains("NFW with 'c'"));
        assert!(msg.contains("Einasto with 'rs' and 'alpha'"));
    }

    #[test]
    fn partial_einasto_is_rejected() {
        let err = ModelParams::from_params(&params(&[("rs", 0.1)])).unwrap_err();
        assert_eq!(
            err,
            ToolkitError::UnsupportedModel {
                keys: vec!["rs".to_string()]
            }
        );
    }

    #[test]
    fn concentration_takes_precedence_over_einasto() {
        let p = params(&[("c", 5.0), ("rs", 0.1), ("alpha", 0.1)]);
        assert_eq!(dispatch(Some(&p)).unwrap(), vec![5.0]);
        assert_eq!(ModelParams::from_params(&p).unwrap(), ModelParams::Nfw { c: 5.0 });
    }

    #[test]
    fn dispatch_is_idempotent() {
        let p = params(&[("rs", 0.3), ("alpha", 0.18)]);
        assert_eq!(dispatch(Some(&p)).unwrap(), dispatch(Some(&p)).unwrap());
    }

    #[test]
    fn named_param_parsing() {
        let p: NamedParam = "alpha = 0.17".parse().unwrap();
        assert_eq!(p.name, "alpha");
        assert_eq!(p.value, 0.17);
        assert!("alpha".parse::<NamedParam>().is_err());
        assert!("=3".parse::<NamedParam>().is_err());
        assert!("c=abc".parse::<NamedParam>().is_err());

        let set = collect_params(&["c=4".parse().unwrap(), "c=6".parse().unwrap()]);
        assert_eq!(ModelParams::from_params(&set).unwrap(), ModelParams::Nfw { c: 6.0 });
    }

    #[test]
    fn model_params_serialize_tagged() {
        let json = serde_json::to_string(&ModelParams::Einasto { rs: 0.2, alpha: 0.18 }).unwrap();
        assert_eq!(json, r#"{"model":"einasto","rs":0.2,"alpha":0.18}"#);
    }
}
