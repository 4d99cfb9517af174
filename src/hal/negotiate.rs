//! Content negotiation between the supported representations.

pub const HAL_JSON: &str = "application/hal+json";
pub const JSON: &str = "application/json";

/// Response representation chosen from an `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Hal,
    Json,
}

/// Pick a representation. HAL is the richer native format and wins whenever
/// it is acceptable; plain JSON is chosen only when the client asks for it
/// specifically and not for HAL.
pub fn negotiate(accept: Option<&str>) -> Representation {
    let Some(accept) = accept else {
        return Representation::Hal;
    };
    let mut plain_json = false;
    for part in accept.split(',') {
        let media_type = part.split(';').next().unwrap_or("").trim();
        match media_type {
            HAL_JSON | "*/*" | "application/*" => return Representation::Hal,
            JSON => plain_json = true,
            _ => {}
        }
    }
    if plain_json {
        Representation::Json
    } else {
        Representation::Hal
    }
}
