//! Integer fields that also accept their decimal string form (`"20"`), as
//! HTML forms submit them.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Float(f64),
    Text(String),
}

/// `Option<i64>` from a number, a numeric string or `null`. A string that is
/// not a whole number reads as absent.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawInt>::deserialize(deserializer)? {
        Some(RawInt::Int(n)) => Some(n),
        Some(RawInt::Float(f)) if f.fract() == 0.0 => Some(f as i64),
        Some(RawInt::Text(s)) => s.trim().parse().ok(),
        Some(RawInt::Float(_)) | None => None,
    })
}
