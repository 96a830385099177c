use dataroom_core::{AppError, AppResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const OCS_OK_V1: u16 = 100;
const OCS_OK_V2: u16 = 200;
const OCS_NOT_FOUND: u16 = 404;

/// Decoded OCS answer.
#[derive(Debug, PartialEq)]
pub(crate) enum OcsReply<T> {
    Data(T),
    NotFound,
}

#[derive(Debug, Deserialize)]
struct OcsEnvelope {
    ocs: OcsBody,
}

#[derive(Debug, Deserialize)]
struct OcsBody {
    meta: OcsMeta,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct OcsMeta {
    statuscode: u16,
    #[serde(default)]
    message: Option<String>,
}

/// Kept loose: the platform sends `groups` as an array or as an index-keyed
/// object.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OcsUser {
    #[serde(default)]
    pub groups: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OcsGroupDetailsPage {
    #[serde(default)]
    pub groups: Vec<OcsGroupDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OcsGroupDetails {
    pub id: String,
    #[serde(default)]
    pub displayname: Option<String>,
    #[serde(default)]
    pub usercount: Value,
}

/// Unwraps the `ocs.meta` / `ocs.data` envelope.
pub(crate) fn decode_ocs_payload<T>(body: &str) -> AppResult<OcsReply<T>>
where
    T: DeserializeOwned,
{
    let envelope: OcsEnvelope = serde_json::from_str(body)
        .map_err(|error| AppError::Upstream(format!("invalid OCS envelope: {error}")))?;

    match envelope.ocs.meta.statuscode {
        OCS_OK_V1 | OCS_OK_V2 => {}
        OCS_NOT_FOUND => return Ok(OcsReply::NotFound),
        statuscode => {
            let message = envelope.ocs.meta.message.unwrap_or_default();
            tracing::warn!(statuscode, message = message.as_str(), "OCS call was not successful");
            return Err(AppError::Upstream(format!(
                "OCS status {statuscode}: {message}"
            )));
        }
    }

    serde_json::from_value(envelope.ocs.data)
        .map(OcsReply::Data)
        .map_err(|error| AppError::Upstream(format!("invalid OCS data: {error}")))
}

/// Backends that cannot count members report `false`; those count as zero.
pub(crate) fn member_count(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
