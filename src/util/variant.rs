use std::fmt;

use super::misc::Res;

// Actorの引数の値
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Variant {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    // 自身と同じ型として文字列をパース
    pub fn parse_same(&self, value: &str) -> Res<Variant> {
        Ok(match self {
            Self::Int(_) => Self::Int(value.parse()?),
            Self::Float(_) => Self::Float(value.parse()?),
            Self::Bool(_) => Self::Bool(value.parse()?),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
    pub value: Variant,
}

impl Arg {
    pub fn int(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Int(value),
        }
    }

    pub fn float(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Float(value),
        }
    }

    pub fn bool(name: &str, value: bool) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Bool(value),
        }
    }
}

#[test]
fn test_variant_parse() {
    let v = Variant::Float(0.0).parse_same("0.25").unwrap();
    assert_eq!(v.as_float(), Some(0.25));
    assert_eq!(Variant::Int(0).parse_same("-3").unwrap().as_int(), Some(-3));
    assert!(Variant::Bool(false).parse_same("yes").is_err());
    assert_eq!(Variant::Int(7).as_bool(), None);
}
