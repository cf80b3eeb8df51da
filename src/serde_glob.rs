use std::borrow::Cow;

use glob::Pattern;
use serde::{Deserialize, Deserializer, de::Error as _};

/// Deserialize a glob pattern from a string, for use with
/// `#[serde(deserialize_with = "crate::serde_glob::deserialize")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Pattern, D::Error>
where
    D: Deserializer<'de>,
{
    let s = <Cow<str>>::deserialize(deserializer)?;
    Pattern::new(&s).map_err(|err| D::Error::custom(format!("invalid glob '{s}': {err}")))
}

/// Same as `deserialize` but for optional fields.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Pattern>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize")] Pattern);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}
