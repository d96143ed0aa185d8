//! Attachment ingestion: raw caller payloads to base64 records.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use confab_store::Attachment;
use futures::future::join_all;

/// A file as handed over by the caller, before encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentPayload {
    pub name: String,
    /// Inferred from the file name when absent.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentPayload {
    pub fn new(name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }
}

/// Encodes all payloads concurrently and joins the results in input
/// order, so attachment order on the outbound turn matches what the
/// caller supplied.
pub async fn encode_attachments(payloads: Vec<AttachmentPayload>) -> Vec<Attachment> {
    join_all(payloads.into_iter().map(|payload| async move {
        encode_payload(payload)
    }))
    .await
}

fn encode_payload(payload: AttachmentPayload) -> Attachment {
    let media_type = payload.media_type.unwrap_or_else(|| {
        mime_guess::from_path(&payload.name)
            .first_or_octet_stream()
            .to_string()
    });
    Attachment {
        name: payload.name,
        media_type,
        data: STANDARD.encode(&payload.bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn encodes_bytes_as_base64_in_input_order() {
        let attachments = encode_attachments(vec![
            AttachmentPayload::new("first.txt", Some("text/plain".to_string()), b"one".to_vec()),
            AttachmentPayload::new("second.txt", Some("text/plain".to_string()), b"two".to_vec()),
        ])
        .await;

        assert_eq!(attachments[0].name, "first.txt");
        assert_eq!(attachments[0].data, "b25l");
        assert_eq!(attachments[1].name, "second.txt");
        assert_eq!(attachments[1].data, "dHdv");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_media_type_is_guessed_from_the_name() {
        let attachments = encode_attachments(vec![
            AttachmentPayload::new("shot.png", None, vec![0u8]),
            AttachmentPayload::new("mystery", None, vec![0u8]),
        ])
        .await;

        assert_eq!(attachments[0].media_type, "image/png");
        assert_eq!(attachments[1].media_type, "application/octet-stream");
    }
}
