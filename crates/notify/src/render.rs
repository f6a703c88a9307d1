//! Assignment message rendering.
//!
//! [`select_renderer`] picks the [`TemplateRenderer`] when a template is
//! configured and the [`FallbackRenderer`] otherwise. Both produce the same
//! required fields, so a missing template never blocks a notification.

use {
    deskroute_common::types::TeamKind, deskroute_config::MessageTemplate, serde::Serialize,
};

use crate::{Error, Result, error::Context};

/// Display name used when the requester is unknown.
pub const GUEST: &str = "Guest";
/// Email shown when the requester has none.
pub const NO_EMAIL: &str = "No email";

/// Everything a notification may mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContent {
    /// Ticket reference.
    pub ticket: String,
    /// Requester display name, or [`GUEST`].
    pub customer: String,
    /// Requester email, or [`NO_EMAIL`].
    pub email: String,
    pub kind: TeamKind,
    pub team: String,
    pub leader: String,
}

impl NotificationContent {
    /// Value of a template placeholder, `None` when the name is unknown.
    #[must_use]
    pub fn placeholder(&self, name: &str) -> Option<String> {
        let value = match name {
            "ticket" => self.ticket.clone(),
            "customer" => self.customer.clone(),
            "email" => self.email.clone(),
            "kind" => self.kind.label().to_string(),
            "kind_lower" => self.kind.to_string(),
            "team" => self.team.clone(),
            "leader" => self.leader.clone(),
            _ => return None,
        };
        Some(value)
    }
}

/// Subject and body ready for a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Turns notification content into a message.
pub trait MessageRenderer: Send + Sync {
    /// Short name for logs ("template"/"fallback").
    fn name(&self) -> &'static str;

    fn render(&self, content: &NotificationContent) -> Result<RenderedMessage>;
}

/// Renders the configured template.
pub struct TemplateRenderer {
    template: MessageTemplate,
}

impl TemplateRenderer {
    pub fn new(template: MessageTemplate) -> Self {
        Self { template }
    }
}

impl MessageRenderer for TemplateRenderer {
    fn name(&self) -> &'static str {
        "template"
    }

    fn render(&self, content: &NotificationContent) -> Result<RenderedMessage> {
        Ok(RenderedMessage {
            subject: fill_placeholders(&self.template.subject, content)?,
            body: fill_placeholders(&self.template.body, content)?,
        })
    }
}

/// Synthesizes a plain message when no template is configured.
pub struct FallbackRenderer;

impl MessageRenderer for FallbackRenderer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn render(&self, content: &NotificationContent) -> Result<RenderedMessage> {
        Ok(RenderedMessage {
            subject: format!("New {} Ticket Assigned", content.kind.label()),
            body: format!(
                "New {kind} ticket assigned to your team.\n\
                 Ticket: {ticket}\n\
                 Customer: {customer}\n\
                 Email: {email}\n",
                kind = content.kind,
                ticket = content.ticket,
                customer = content.customer,
                email = content.email,
            ),
        })
    }
}

/// Pick the renderer for the current template availability.
pub fn select_renderer(template: Option<&MessageTemplate>) -> Box<dyn MessageRenderer> {
    match template {
        Some(template) => Box::new(TemplateRenderer::new(template.clone())),
        None => Box::new(FallbackRenderer),
    }
}

/// Replace `{{name}}` placeholders. Unknown names and unclosed braces are
/// errors so a broken template is caught instead of mailed.
fn fill_placeholders(input: &str, content: &NotificationContent) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| Error::template(format!("unclosed placeholder near {:?}", &rest[start..])))?;
        let name = after[..end].trim();
        let value = content
            .placeholder(name)
            .with_context(|| format!("unknown placeholder {{{{{name}}}}}"))?;
        result.push_str(&value);
        rest = &after[end + 2..];
    }
    result.push_str(rest);

    Ok(result)
}
