//! Lenient deserializers for hand-written YAML.
//!
//! YAML happily turns `version: 2` into an integer and `tickets: [100]` into a
//! list of integers; both are meant as strings.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Scalar),
    Many(Vec<Option<Scalar>>),
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// A list of strings; a single scalar counts as a one-element list and null
/// entries are dropped.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value.into_string()],
        Some(OneOrMany::Many(values)) => values
            .into_iter()
            .flatten()
            .map(Scalar::into_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        version: Option<String>,
        #[serde(default, deserialize_with = "string_list")]
        tickets: Vec<String>,
    }

    #[test]
    fn test_numbers_become_strings() {
        let probe: Probe = serde_yaml::from_str("version: 2\ntickets: [100, '200', ~]").unwrap();
        assert_eq!(probe.version.as_deref(), Some("2"));
        assert_eq!(probe.tickets, vec!["100", "200"]);
    }

    #[test]
    fn test_single_value_list() {
        let probe: Probe = serde_yaml::from_str("tickets: JIRA-1").unwrap();
        assert_eq!(probe.tickets, vec!["JIRA-1"]);
        assert!(probe.version.is_none());
    }
}
