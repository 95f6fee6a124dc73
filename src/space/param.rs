//! Parameter domains, sampled values, and the label scheme.
//!
//! Labels are a pure function of (kind, per-kind declaration sequence,
//! domain bounds/options), so structurally identical parameters from
//! independently rebuilt spaces compare equal by label.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameter value sampled from a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl ParamValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            // {:?} keeps the decimal point on round floats (0.0, not 0)
            ParamValue::Float(v) => write!(f, "{v:?}"),
            ParamValue::Str(s) => write!(f, "'{s}'"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Kind tag used in parameter labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    Int,
    Choice,
    Bool,
    Real,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Int => write!(f, "Int"),
            ParamKind::Choice => write!(f, "Choice"),
            ParamKind::Bool => write!(f, "Bool"),
            ParamKind::Real => write!(f, "Real"),
        }
    }
}

/// Parameter domain (one tunable value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamDomain {
    /// Inclusive integer range [low, high]
    Int { low: i64, high: i64 },
    /// Ordered list of scalar options
    Choice { options: Vec<ParamValue> },
    /// Two-valued; branches like a choice over {false, true}
    Bool,
    /// Inclusive real interval [low, high]
    Real { low: f64, high: f64 },
}

impl ParamDomain {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamDomain::Int { .. } => ParamKind::Int,
            ParamDomain::Choice { .. } => ParamKind::Choice,
            ParamDomain::Bool => ParamKind::Bool,
            ParamDomain::Real { .. } => ParamKind::Real,
        }
    }

    /// Textual form of the bounds/options, used in labels
    pub fn describe(&self) -> String {
        match self {
            ParamDomain::Int { low, high } => format!("{low}-{high}"),
            ParamDomain::Choice { options } => {
                let rendered: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                format!("[{}]", rendered.join(", "))
            }
            ParamDomain::Bool => "[false, true]".to_string(),
            ParamDomain::Real { low, high } => format!("{low:?}-{high:?}"),
        }
    }

    /// Sample a uniformly distributed value from this domain
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParamValue {
        match self {
            ParamDomain::Int { low, high } => {
                let range = (*high - *low + 1) as usize;
                let offset = (rng.random::<f64>() * range as f64).floor() as i64;
                ParamValue::Int((*low + offset).min(*high))
            }
            ParamDomain::Choice { options } => {
                let idx = (rng.random::<f64>() * options.len() as f64).floor() as usize;
                options[idx.min(options.len() - 1)].clone()
            }
            ParamDomain::Bool => ParamValue::Bool(rng.random::<bool>()),
            ParamDomain::Real { low, high } => {
                ParamValue::Float(low + rng.random::<f64>() * (high - low))
            }
        }
    }

    /// Check whether a value belongs to this domain
    pub fn contains(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamDomain::Int { low, high }, ParamValue::Int(v)) => *v >= *low && *v <= *high,
            (ParamDomain::Choice { options }, v) => options.contains(v),
            (ParamDomain::Bool, ParamValue::Bool(_)) => true,
            (ParamDomain::Real { low, high }, ParamValue::Float(v)) => *v >= *low && *v <= *high,
            _ => false,
        }
    }

    /// Whether distinct samples can repeat (real intervals practically never do)
    pub fn is_continuous(&self) -> bool {
        matches!(self, ParamDomain::Real { .. })
    }
}

/// Deterministic label: `Param_<Kind>_<seq>-<description>`.
///
/// `seq` is the 1-based declaration counter per kind, assigned by the
/// recording scope.
pub(crate) fn param_label(domain: &ParamDomain, seq: usize) -> String {
    format!("Param_{}_{}-{}", domain.kind(), seq, domain.describe())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(ParamValue::Int(42).as_int(), Some(42));
        assert_eq!(ParamValue::Int(42).as_float(), Some(42.0));
        assert_eq!(ParamValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(ParamValue::Float(0.5).as_int(), None);
        assert_eq!(ParamValue::Str("a".to_string()).as_str(), Some("a"));
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ParamValue::Int(7).to_string(), "7");
        assert_eq!(ParamValue::Float(0.0).to_string(), "0.0");
        assert_eq!(ParamValue::Float(0.25).to_string(), "0.25");
        assert_eq!(ParamValue::Str("a".to_string()).to_string(), "'a'");
        assert_eq!(ParamValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_label_int() {
        let domain = ParamDomain::Int { low: 1, high: 100 };
        assert_eq!(param_label(&domain, 1), "Param_Int_1-1-100");
    }

    #[test]
    fn test_label_choice() {
        let domain = ParamDomain::Choice {
            options: vec![
                ParamValue::Str("a".to_string()),
                ParamValue::Str("b".to_string()),
            ],
        };
        assert_eq!(param_label(&domain, 1), "Param_Choice_1-['a', 'b']");
    }

    #[test]
    fn test_label_bool_and_real() {
        assert_eq!(param_label(&ParamDomain::Bool, 1), "Param_Bool_1-[false, true]");
        let domain = ParamDomain::Real { low: 0.0, high: 1.0 };
        assert_eq!(param_label(&domain, 1), "Param_Real_1-0.0-1.0");
    }

    #[test]
    fn test_label_uses_per_kind_sequence() {
        let first = ParamDomain::Int { low: 1, high: 8 };
        let second = ParamDomain::Int { low: 1, high: 8 };
        assert_eq!(param_label(&first, 1), "Param_Int_1-1-8");
        assert_eq!(param_label(&second, 2), "Param_Int_2-1-8");
    }

    #[test]
    fn test_int_sample_in_bounds() {
        let domain = ParamDomain::Int { low: 1, high: 100 };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.contains(&value));
        }
    }

    #[test]
    fn test_choice_sample_from_options() {
        let domain = ParamDomain::Choice {
            options: vec![
                ParamValue::Str("relu".to_string()),
                ParamValue::Str("gelu".to_string()),
                ParamValue::Str("tanh".to_string()),
            ],
        };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.contains(&value));
        }
    }

    #[test]
    fn test_real_sample_in_bounds() {
        let domain = ParamDomain::Real { low: 0.0, high: 1.0 };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let value = domain.sample(&mut rng);
            assert!(domain.contains(&value));
        }
    }

    #[test]
    fn test_bool_sample() {
        let domain = ParamDomain::Bool;
        let mut rng = rand::rng();
        let value = domain.sample(&mut rng);
        assert!(domain.contains(&value));
    }

    #[test]
    fn test_contains_type_mismatch() {
        let domain = ParamDomain::Int { low: 0, high: 10 };
        assert!(!domain.contains(&ParamValue::Float(5.0)));

        let domain = ParamDomain::Choice {
            options: vec![ParamValue::Str("a".to_string())],
        };
        assert!(!domain.contains(&ParamValue::Int(0)));

        let domain = ParamDomain::Real { low: 0.0, high: 1.0 };
        assert!(!domain.contains(&ParamValue::Int(0)));
        assert!(!domain.contains(&ParamValue::Float(1.5)));
    }

    #[test]
    fn test_is_continuous() {
        assert!(ParamDomain::Real { low: 0.0, high: 1.0 }.is_continuous());
        assert!(!ParamDomain::Int { low: 0, high: 1 }.is_continuous());
        assert!(!ParamDomain::Bool.is_continuous());
    }

    #[test]
    fn test_param_value_serde() {
        for value in [
            ParamValue::Int(42),
            ParamValue::Float(0.5),
            ParamValue::Str("relu".to_string()),
            ParamValue::Bool(true),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let parsed: ParamValue = serde_json::from_str(&json).unwrap();
            assert_eq!(value, parsed);
        }
    }

    #[test]
    fn test_param_domain_serde() {
        let domain = ParamDomain::Choice {
            options: vec![ParamValue::Str("a".to_string()), ParamValue::Int(3)],
        };
        let json = serde_json::to_string(&domain).unwrap();
        let parsed: ParamDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(domain, parsed);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_int_domain_valid(low in -100i64..0, high in 0i64..100) {
            let domain = ParamDomain::Int { low, high };
            let mut rng = rand::rng();
            let value = domain.sample(&mut rng);
            prop_assert!(domain.contains(&value));
        }

        #[test]
        fn prop_real_domain_valid(low in -100.0f64..0.0, high in 0.0f64..100.0) {
            let domain = ParamDomain::Real { low, high };
            let mut rng = rand::rng();
            let value = domain.sample(&mut rng);
            prop_assert!(domain.contains(&value));
        }

        #[test]
        fn prop_label_deterministic(low in -100i64..0, high in 0i64..100, seq in 1usize..50) {
            let a = ParamDomain::Int { low, high };
            let b = ParamDomain::Int { low, high };
            prop_assert_eq!(param_label(&a, seq), param_label(&b, seq));
        }
    }
}
