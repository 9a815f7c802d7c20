use crate::reply::Reply;

use super::error::ExchangeError;

/// Reduce a reply to display text.
///
/// Only the first candidate is read. Each of its parts is rendered through
/// its `Display` form and followed by a newline, in order. A reply with no
/// candidates is malformed, not empty.
pub fn flatten_reply(reply: &Reply) -> Result<String, ExchangeError> {
    let candidate = reply.first_candidate().ok_or_else(|| {
        ExchangeError::MalformedReply(match reply.block_reason() {
            Some(reason) => format!("no candidates in reply (prompt blocked: {reason})"),
            None => "no candidates in reply".to_string(),
        })
    })?;

    let mut out = String::new();
    for part in &candidate.content.parts {
        out.push_str(&part.to_string());
        out.push('\n');
    }
    Ok(out)
}
