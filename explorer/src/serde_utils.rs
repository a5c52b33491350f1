use serde::{Deserialize, Deserializer};

/// Decodes `null` as the type's default value.
///
/// The explorer reports absent execution payload fields as `null` rather
/// than omitting them; pair with `#[serde(default)]` to cover both.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
