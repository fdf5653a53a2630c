//! Backend-agnostic chat message representation.
//!
//! Providers translate these into their own wire shapes; nothing here is
//! serialized directly.

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// The wire name used by every supported backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One part of a multimodal message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text.
    Text(String),
    /// A base64-encoded JPEG image, without a data-URI prefix.
    Image { base64: String },
}

/// A message body: plain text, or an ordered sequence of parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// All text parts joined with a single space.
    pub fn joined_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text(text) => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Whether any part carries an image.
    pub fn has_image(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, ContentPart::Image { .. })),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message carrying text plus one image.
    pub fn user_with_image(text: impl Into<String>, image_base64: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text(text.into()),
                ContentPart::Image {
                    base64: image_base64.into(),
                },
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_joined_text_single_space_separator() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text("describe".to_string()),
            ContentPart::Image {
                base64: "QUJD".to_string(),
            },
            ContentPart::Text("this".to_string()),
        ]);
        assert_eq!(content.joined_text(), "describe this");
    }

    #[test]
    fn test_user_with_image_part_order() {
        let msg = Message::user_with_image("describe", "QUJD");
        assert_eq!(msg.role, Role::User);
        assert!(msg.content.has_image());
        match &msg.content {
            MessageContent::Parts(parts) => {
                assert!(matches!(parts[0], ContentPart::Text(_)));
                assert!(matches!(parts[1], ContentPart::Image { .. }));
            }
            MessageContent::Text(_) => panic!("expected parts"),
        }
    }
}
