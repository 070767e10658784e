use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "photo")]
    pub photo: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(rename = "identifier")]
    pub identifier: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(rename = "name")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateGroupRequest {
    #[serde(rename = "groupName")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "photo", with = "base64_bytes")]
    pub photo: Vec<u8>,
}

/// `reply_to` references another message by id only. The `reply_*` fields are
/// a copy of that message taken when the reply was written and may be stale.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "senderName")]
    pub sender_name: String,
    #[serde(rename = "content")]
    pub content: String,
    #[serde(rename = "timestamp")]
    pub timestamp: String,
    #[serde(rename = "attachment", with = "base64_bytes")]
    pub attachment: Vec<u8>,

    #[serde(rename = "replyTo", default)]
    pub reply_to: String,
    #[serde(rename = "replyContent", default)]
    pub reply_content: String,
    #[serde(rename = "replySenderName", default)]
    pub reply_sender_name: String,
    #[serde(rename = "replyAttachment", with = "base64_bytes", default)]
    pub reply_attachment: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplySnapshot<'a> {
    pub message_id: &'a str,
    pub content: &'a str,
    pub sender_name: &'a str,
    pub attachment: &'a [u8],
}

impl Message {
    pub fn is_reply(&self) -> bool {
        !self.reply_to.is_empty()
    }

    pub fn reply_snapshot(&self) -> Option<ReplySnapshot<'_>> {
        if !self.is_reply() {
            return None;
        }
        Some(ReplySnapshot {
            message_id: &self.reply_to,
            content: &self.reply_content,
            sender_name: &self.reply_sender_name,
            attachment: &self.reply_attachment,
        })
    }

    // Clients may send anything here; unparsable is None, not an error.
    pub fn sent_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

// Standard padded base64; `null` reads as empty.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| D::Error::custom(format!("invalid base64: {}", e))),
            None => Ok(Vec::new()),
        }
    }
}
