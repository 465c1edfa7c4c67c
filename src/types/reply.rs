//! Outbound chat messages

use serde::{Deserialize, Serialize};

/// Binary file attached to a reply.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One named section of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Rich message: title, description, color and fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
    /// Image reference, e.g. `attachment://graph.png`.
    pub image_url: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// A message the bot sends back to the channel a command came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Text(String),
    Embed {
        embed: Embed,
        attachment: Option<Attachment>,
    },
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }

    pub fn embed(embed: Embed) -> Self {
        Reply::Embed {
            embed,
            attachment: None,
        }
    }

    pub fn embed_with_attachment(embed: Embed, attachment: Attachment) -> Self {
        Reply::Embed {
            embed,
            attachment: Some(attachment),
        }
    }

    /// Plain-text rendering for transports without rich message support.
    pub fn render_text(&self) -> String {
        match self {
            Reply::Text(content) => content.clone(),
            Reply::Embed { embed, attachment } => {
                let mut out = format!("== {} (#{:06X}) ==", embed.title, embed.color);
                if let Some(description) = &embed.description {
                    out.push('\n');
                    out.push_str(description);
                }
                for field in &embed.fields {
                    out.push_str(&format!("\n[{}]\n{}", field.name, field.value));
                }
                if let Some(attachment) = attachment {
                    out.push_str(&format!(
                        "\n<attachment {} ({} bytes)>",
                        attachment.filename,
                        attachment.bytes.len()
                    ));
                }
                if let Some(footer) = &embed.footer {
                    out.push_str(&format!("\n-- {footer}"));
                }
                out
            }
        }
    }
}
