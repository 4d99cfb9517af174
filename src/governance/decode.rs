//! Permission-record decoding, one decoder per supported media type.
//!
//! A governance replace can carry its inheritance pointer in two wire shapes:
//! a `Link: </path>; rel="inherit"` request header next to a plain JSON body,
//! or a `_links.inherit.href` entry inside a HAL body. Both decoders
//! normalize to the same [`PermissionRecord`] before anything is stored.

use crate::error::{ApiError, ApiResult};
use crate::governance::record::PermissionRecord;
use crate::hal::parse_link_header;
use serde_json::{Map, Value};

/// Decode an `application/json` body; the pointer, if any, arrives in the
/// `Link` request header.
pub fn decode_json_permissions(
    body: &[u8],
    link_header: Option<&str>,
) -> ApiResult<PermissionRecord> {
    let mut record = PermissionRecord::from_map(parse_body(body)?);
    if let Some(header) = link_header {
        let inherit = parse_link_header(header)
            .into_iter()
            .find(|(relation, _)| relation == "inherit")
            .map(|(_, target)| target);
        if inherit.is_some() {
            record.inherit = inherit;
        }
    }
    Ok(record)
}

/// Decode an `application/hal+json` body; the pointer, if any, arrives as
/// `_links.inherit.href`. The `_links` object is wire dressing and is not
/// stored.
pub fn decode_hal_permissions(body: &[u8]) -> ApiResult<PermissionRecord> {
    let mut map = parse_body(body)?;
    let links = map.remove("_links");
    let mut record = PermissionRecord::from_map(map);
    let inherit = links
        .as_ref()
        .and_then(|links| links.get("inherit"))
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if inherit.is_some() {
        record.inherit = inherit;
    }
    Ok(record)
}

fn parse_body(body: &[u8]) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest(
            "Permissions must be a JSON object.".to_string(),
        )),
        Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {e}"))),
    }
}
