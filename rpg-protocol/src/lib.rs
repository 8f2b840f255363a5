//! Wire framing for the game server's TCP channel (§4.1): every message is
//! `u32_be(len) ∥ utf8_json(payload)`, where the payload decodes to an
//! [`Envelope`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("connection closed")]
    Closed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("payload was not valid utf-8 json: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fixed set of message types exchanged on the game socket (§6.1). The
/// wire value is the uppercase identifier, matching the envelope's `type`
/// field exactly as specified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "LOGIN")]
    Login,
    #[serde(rename = "INITIAL_WORLD_STATE")]
    InitialWorldState,
    #[serde(rename = "WORLD_STATE_UPDATE")]
    WorldStateUpdate,
    #[serde(rename = "PLAYER_MOVE")]
    PlayerMove,
    #[serde(rename = "CHAT_MESSAGE")]
    ChatMessage,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "EQUIP_ITEM")]
    EquipItem,
    #[serde(rename = "UNEQUIP_ITEM")]
    UnequipItem,
    #[serde(rename = "USE_ITEM")]
    UseItem,
    #[serde(rename = "DISCARD_ITEM")]
    DiscardItem,
    #[serde(rename = "PLAYER_ENTERED_POI")]
    PlayerEnteredPoi,
}

/// `{type, data}` — the envelope carried by every frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub data: Value,
}

impl Envelope {
    pub fn new(message_type: MessageType, data: Value) -> Self {
        Self { message_type, data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Error,
            data: Value::String(message.into()),
        }
    }
}

/// Reads exactly one frame: 4 bytes big-endian length, then that many bytes
/// parsed as JSON. A clean zero-byte read on the length prefix closes the
/// connection (`FrameError::Closed`), not an error.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Envelope, FrameError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(FrameError::Closed),
        Err(e) => return Err(FrameError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf) as usize;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    let envelope: Envelope = serde_json::from_slice(&payload)?;
    Ok(envelope)
}

/// Writes one frame: length prefix followed by the JSON payload.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, envelope: &Envelope) -> Result<(), FrameError> {
    let payload = serde_json::to_vec(envelope)?;
    let len = (payload.len() as u32).to_be_bytes();
    writer.write_all(&len).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn round_trips_a_well_formed_frame() {
        let envelope = Envelope::new(MessageType::PlayerMove, serde_json::json!({"dx": 1, "dy": 0}));
        let mut buf = Vec::new();
        write_frame(&mut buf, &envelope).await.unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = read_frame(&mut cursor).await.unwrap();
        assert_eq!(decoded.message_type, MessageType::PlayerMove);
        assert_eq!(decoded.data, serde_json::json!({"dx": 1, "dy": 0}));
    }

    #[tokio::test]
    async fn empty_stream_closes_cleanly() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let err = read_frame(&mut cursor).await.unwrap_err();
        assert!(matches!(err, FrameError::Closed));
    }

    #[tokio::test]
    async fn partial_length_prefix_is_treated_as_closed() {
        let mut cursor = Cursor::new(vec![0u8, 0u8]);
        let err = read_frame(&mut cursor).await.unwrap_err();
        assert!(matches!(err, FrameError::Closed));
    }

    #[test]
    fn message_type_serializes_to_uppercase_identifier() {
        let v = serde_json::to_value(MessageType::PlayerEnteredPoi).unwrap();
        assert_eq!(v, serde_json::json!("PLAYER_ENTERED_POI"));
    }

    #[test]
    fn error_envelope_carries_plain_string_payload() {
        let envelope = Envelope::error("character not found");
        let v = serde_json::to_value(&envelope).unwrap();
        assert_eq!(v["type"], "ERROR");
        assert_eq!(v["data"], "character not found");
    }
}
