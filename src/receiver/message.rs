use crate::foundation::error::{PenError, PenResult};

/// One pen message, as sent by the Scratch extension.
///
/// Encoded as a JSON object with a `type` discriminator. Coordinates are in stage space (origin at
/// the canvas centre, Y up). Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum PenMessage {
    /// Move from `(old_x, old_y)` to `(x, y)`.
    #[serde(rename = "goToXY")]
    GoToXy {
        /// Target X.
        x: f64,
        /// Target Y.
        y: f64,
        /// Start X.
        #[serde(rename = "oldX")]
        old_x: f64,
        /// Start Y.
        #[serde(rename = "oldY")]
        old_y: f64,
    },
    /// Erase both line layers.
    #[serde(rename = "clear")]
    Clear,
    /// Any other `type` value.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl PenMessage {
    /// Convenience constructor for [`PenMessage::GoToXy`] taking the start point first.
    pub fn go_to(old: (f64, f64), new: (f64, f64)) -> Self {
        Self::GoToXy {
            x: new.0,
            y: new.1,
            old_x: old.0,
            old_y: old.1,
        }
    }

    /// Decode one text frame.
    pub fn decode(text: &str) -> PenResult<Self> {
        serde_json::from_str(text).map_err(|e| PenError::protocol(e.to_string()))
    }

    /// Encode as a single-line JSON text frame.
    pub fn encode(&self) -> PenResult<String> {
        serde_json::to_string(self).map_err(|e| PenError::protocol(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receiver/message.rs"]
mod tests;
