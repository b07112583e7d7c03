use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Who authored a turn. Serialized names match the roles Gemini expects in
/// `contents[].role`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}
