//! Team-leader notification for a routed ticket.

use std::sync::Arc;

use {
    deskroute_common::types::{Team, TeamKind, Ticket, User},
    deskroute_config::{MessageTemplate, NotificationsConfig},
    deskroute_notify::{
        Error as NotifyError, MailMessage, MailSender, Note, NoteSink, NotificationChannel,
        NotificationContent, NotificationLog, NotificationLogEntry, RenderedMessage,
        render::{GUEST, NO_EMAIL},
        select_renderer,
    },
    serde::Serialize,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use deskroute_metrics::{counter, labels, notifications as notify_metrics};

use crate::domain::resolve_email;

/// Per-run notification state, owned by the routing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyGuard {
    /// Set once a notification has been attempted in this run.
    pub notified: bool,
    /// Host asked for no notification in this run.
    pub suppressed: bool,
}

impl NotifyGuard {
    #[must_use]
    pub fn suppressed() -> Self {
        Self {
            notified: false,
            suppressed: true,
        }
    }
}

/// What a notification attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// Both channels were attempted; each flag says whether it was accepted.
    Dispatched { email: bool, note: bool },
    Disabled,
    Suppressed,
    AlreadyNotified,
    NoTeam,
    NoLeader,
}

impl NotificationOutcome {
    fn skip_reason(&self) -> Option<&'static str> {
        match self {
            Self::Dispatched { .. } => None,
            Self::Disabled => Some("disabled"),
            Self::Suppressed => Some("suppressed"),
            Self::AlreadyNotified => Some("already_notified"),
            Self::NoTeam => Some("no_team"),
            Self::NoLeader => Some("no_leader"),
        }
    }
}

/// Sends the assignment notice to a team's leader over email and an in-app
/// note.
pub struct LeaderNotifier {
    mail: Arc<dyn MailSender>,
    notes: Arc<dyn NoteSink>,
    log: Option<Arc<dyn NotificationLog>>,
    template: Option<MessageTemplate>,
    default_lang: Option<String>,
}

impl LeaderNotifier {
    pub fn new(mail: Arc<dyn MailSender>, notes: Arc<dyn NoteSink>) -> Self {
        Self {
            mail,
            notes,
            log: None,
            template: None,
            default_lang: None,
        }
    }

    /// Notifier using the template and default language from the config file.
    pub fn from_config(
        mail: Arc<dyn MailSender>,
        notes: Arc<dyn NoteSink>,
        config: &NotificationsConfig,
    ) -> Self {
        Self::new(mail, notes)
            .with_template(config.template.clone())
            .with_default_lang(config.default_lang.clone())
    }

    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn NotificationLog>) -> Self {
        self.log = Some(log);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: Option<MessageTemplate>) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn with_default_lang(mut self, lang: Option<String>) -> Self {
        self.default_lang = lang;
        self
    }

    /// Notify the leader of `team` that `ticket` landed on their team.
    ///
    /// Never fails: each channel is attempted on its own and a failure is
    /// logged and recorded. At most one attempt is made per `guard`.
    pub async fn notify_leader(
        &self,
        ticket: &Ticket,
        team: Option<&Team>,
        enabled: bool,
        guard: &mut NotifyGuard,
    ) -> NotificationOutcome {
        let outcome = self.dispatch(ticket, team, enabled, guard).await;
        if let Some(reason) = outcome.skip_reason() {
            debug!(ticket = %ticket.name, reason, "leader notification skipped");
            #[cfg(feature = "metrics")]
            counter!(notify_metrics::SKIPPED_TOTAL, labels::REASON => reason).increment(1);
        }
        outcome
    }

    async fn dispatch(
        &self,
        ticket: &Ticket,
        team: Option<&Team>,
        enabled: bool,
        guard: &mut NotifyGuard,
    ) -> NotificationOutcome {
        if !enabled {
            return NotificationOutcome::Disabled;
        }
        if guard.suppressed {
            info!(ticket = %ticket.name, "leader notification suppressed by caller");
            return NotificationOutcome::Suppressed;
        }
        if guard.notified {
            return NotificationOutcome::AlreadyNotified;
        }
        let Some(team) = team else {
            return NotificationOutcome::NoTeam;
        };
        let Some(leader) = team.leader.as_ref() else {
            warn!(ticket = %ticket.name, team = %team.name, "team has no leader to notify");
            return NotificationOutcome::NoLeader;
        };

        guard.notified = true;

        let content = NotificationContent {
            ticket: ticket.name.clone(),
            customer: ticket
                .contact
                .as_ref()
                .map(|c| c.name.trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(GUEST)
                .to_string(),
            email: resolve_email(ticket).unwrap_or(NO_EMAIL).to_string(),
            kind: TeamKind::from_internal(ticket.is_internal),
            team: team.name.clone(),
            leader: leader.name.clone(),
        };

        let email = self.send_email(ticket, leader, &content).await;
        let note = self.post_note(ticket, leader, &content).await;

        info!(
            ticket = %ticket.name,
            team = %team.name,
            leader = %leader.name,
            email,
            note,
            "team leader notified"
        );
        NotificationOutcome::Dispatched { email, note }
    }

    async fn send_email(&self, ticket: &Ticket, leader: &User, content: &NotificationContent) -> bool {
        let channel = NotificationChannel::Email;
        let Some(to) = leader.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            let err = NotifyError::no_recipient(format!("leader {} has no email address", leader.name));
            warn!(ticket = %ticket.name, leader_id = %leader.id, "skipping email: {err}");
            self.finish(ticket, leader, channel, String::new(), Err(err)).await;
            return false;
        };

        let message = match self.render(content) {
            Ok(message) => message,
            Err(err) => {
                self.finish(ticket, leader, channel, String::new(), Err(err)).await;
                return false;
            },
        };

        let mail = MailMessage {
            ticket_id: ticket.id,
            recipient_id: leader.id,
            to: to.to_string(),
            lang: leader.lang.clone().or_else(|| self.default_lang.clone()),
            subject: message.subject.clone(),
            body: message.body,
        };
        let result = self.mail.send_mail(&mail).await;
        self.finish(ticket, leader, channel, message.subject, result).await
    }

    async fn post_note(&self, ticket: &Ticket, leader: &User, content: &NotificationContent) -> bool {
        let channel = NotificationChannel::Note;
        let message = match self.render(content) {
            Ok(message) => message,
            Err(err) => {
                self.finish(ticket, leader, channel, String::new(), Err(err)).await;
                return false;
            },
        };

        let note = Note {
            ticket_id: ticket.id,
            recipient_id: leader.id,
            subject: message.subject.clone(),
            body: message.body,
        };
        let result = self.notes.post_note(&note).await;
        self.finish(ticket, leader, channel, message.subject, result).await
    }

    fn render(&self, content: &NotificationContent) -> deskroute_notify::Result<RenderedMessage> {
        let renderer = select_renderer(self.template.as_ref());
        debug!(renderer = renderer.name(), "rendering leader notification");
        renderer.render(content)
    }

    /// Log, count and record one channel attempt. Returns whether it was
    /// accepted.
    async fn finish(
        &self,
        ticket: &Ticket,
        leader: &User,
        channel: NotificationChannel,
        subject: String,
        result: deskroute_notify::Result<()>,
    ) -> bool {
        let outcome = match result {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                counter!(notify_metrics::SENT_TOTAL, labels::CHANNEL => channel.as_str()).increment(1);
                Ok(())
            },
            Err(e) => {
                warn!(ticket = %ticket.name, %channel, error = %e, "leader notification channel failed");
                #[cfg(feature = "metrics")]
                counter!(notify_metrics::FAILED_TOTAL, labels::CHANNEL => channel.as_str()).increment(1);
                Err(e.to_string())
            },
        };
        let delivered = outcome.is_ok();

        if let Some(log) = &self.log {
            let entry = NotificationLogEntry::new(ticket.id, leader.id, channel, subject, outcome);
            if let Err(e) = log.record(entry).await {
                warn!(ticket = %ticket.name, %channel, error = %e, "failed to record notification");
            }
        }
        delivered
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use {
        super::*,
        async_trait::async_trait,
        deskroute_common::types::{Contact, TeamId, UserId},
        deskroute_notify::{MemoryNotificationLog, Result as NotifyResult},
    };

    #[derive(Default)]
    struct Outbox {
        mails: Mutex<Vec<MailMessage>>,
        notes: Mutex<Vec<Note>>,
        fail_mail: bool,
    }

    #[async_trait]
    impl MailSender for Outbox {
        async fn send_mail(&self, message: &MailMessage) -> NotifyResult<()> {
            if self.fail_mail {
                return Err(NotifyError::unavailable("smtp down"));
            }
            self.mails.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl NoteSink for Outbox {
        async fn post_note(&self, note: &Note) -> NotifyResult<()> {
            self.notes.lock().unwrap().push(note.clone());
            Ok(())
        }
    }

    fn leader(email: Option<&str>, lang: Option<&str>) -> User {
        User {
            id: UserId(100),
            name: "Lea".into(),
            email: email.map(str::to_string),
            lang: lang.map(str::to_string),
        }
    }

    fn team(leader: Option<User>) -> Team {
        Team {
            id: TeamId(1),
            name: "Internal Helpdesk".into(),
            symbolic_ref: Some("internal_helpdesk_team".into()),
            leader,
        }
    }

    fn ticket() -> Ticket {
        let mut ticket = Ticket::new(42, "HT00042").with_contact(Contact {
            name: "Ana".into(),
            email: Some("ana@wavext.io".into()),
        });
        ticket.is_internal = true;
        ticket
    }

    fn notifier(outbox: &Arc<Outbox>) -> LeaderNotifier {
        LeaderNotifier::new(outbox.clone(), outbox.clone())
    }

    #[tokio::test]
    async fn sends_both_channels_with_fallback_text() {
        let outbox = Arc::new(Outbox::default());
        let log = Arc::new(MemoryNotificationLog::new());
        let notifier = notifier(&outbox)
            .with_log(log.clone())
            .with_default_lang(Some("en_US".into()));
        let mut guard = NotifyGuard::default();

        let outcome = notifier
            .notify_leader(&ticket(), Some(&team(Some(leader(Some("lea@wavext.io"), None)))), true, &mut guard)
            .await;

        assert_eq!(outcome, NotificationOutcome::Dispatched {
            email: true,
            note: true
        });
        assert!(guard.notified);

        let mails = outbox.mails.lock().unwrap();
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].to, "lea@wavext.io");
        assert_eq!(mails[0].lang.as_deref(), Some("en_US"));
        assert_eq!(mails[0].subject, "New Internal Ticket Assigned");
        assert!(mails[0].body.contains("Customer: Ana"));
        assert!(mails[0].body.contains("Email: ana@wavext.io"));

        let notes = outbox.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].recipient_id, UserId(100));
        assert_eq!(log.entries().len(), 2);
    }

    #[tokio::test]
    async fn leader_language_wins_over_default() {
        let outbox = Arc::new(Outbox::default());
        let notifier = notifier(&outbox).with_default_lang(Some("en_US".into()));
        let team = team(Some(leader(Some("lea@wavext.io"), Some("es_ES"))));

        notifier
            .notify_leader(&ticket(), Some(&team), true, &mut NotifyGuard::default())
            .await;

        assert_eq!(outbox.mails.lock().unwrap()[0].lang.as_deref(), Some("es_ES"));
    }

    #[tokio::test]
    async fn guest_and_no_email_placeholders() {
        let outbox = Arc::new(Outbox::default());
        let team = team(Some(leader(Some("lea@wavext.io"), None)));

        notifier(&outbox)
            .notify_leader(&Ticket::new(7, "HT00007"), Some(&team), true, &mut NotifyGuard::default())
            .await;

        let mails = outbox.mails.lock().unwrap();
        assert_eq!(mails[0].subject, "New External Ticket Assigned");
        assert!(mails[0].body.contains("Customer: Guest"));
        assert!(mails[0].body.contains("Email: No email"));
    }

    #[tokio::test]
    async fn at_most_once_per_guard() {
        let outbox = Arc::new(Outbox::default());
        let notifier = notifier(&outbox);
        let team = team(Some(leader(Some("lea@wavext.io"), None)));
        let mut guard = NotifyGuard::default();

        notifier.notify_leader(&ticket(), Some(&team), true, &mut guard).await;
        let second = notifier.notify_leader(&ticket(), Some(&team), true, &mut guard).await;

        assert_eq!(second, NotificationOutcome::AlreadyNotified);
        assert_eq!(outbox.mails.lock().unwrap().len(), 1);
        assert_eq!(outbox.notes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_ops() {
        let outbox = Arc::new(Outbox::default());
        let notifier = notifier(&outbox);
        let staffed = team(Some(leader(Some("lea@wavext.io"), None)));

        let disabled = notifier
            .notify_leader(&ticket(), Some(&staffed), false, &mut NotifyGuard::default())
            .await;
        let suppressed = notifier
            .notify_leader(&ticket(), Some(&staffed), true, &mut NotifyGuard::suppressed())
            .await;
        let no_team = notifier
            .notify_leader(&ticket(), None, true, &mut NotifyGuard::default())
            .await;
        let mut guard = NotifyGuard::default();
        let no_leader = notifier
            .notify_leader(&ticket(), Some(&team(None)), true, &mut guard)
            .await;

        assert_eq!(disabled, NotificationOutcome::Disabled);
        assert_eq!(suppressed, NotificationOutcome::Suppressed);
        assert_eq!(no_team, NotificationOutcome::NoTeam);
        assert_eq!(no_leader, NotificationOutcome::NoLeader);
        assert!(!guard.notified);
        assert!(outbox.mails.lock().unwrap().is_empty());
        assert!(outbox.notes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_failure_still_posts_note() {
        let outbox = Arc::new(Outbox {
            fail_mail: true,
            ..Outbox::default()
        });
        let log = Arc::new(MemoryNotificationLog::new());
        let team = team(Some(leader(Some("lea@wavext.io"), None)));

        let outcome = notifier(&outbox)
            .with_log(log.clone())
            .notify_leader(&ticket(), Some(&team), true, &mut NotifyGuard::default())
            .await;

        assert_eq!(outcome, NotificationOutcome::Dispatched {
            email: false,
            note: true
        });
        assert_eq!(outbox.notes.lock().unwrap().len(), 1);

        let entries = log.entries();
        let email = entries
            .iter()
            .find(|e| e.channel == NotificationChannel::Email)
            .unwrap();
        assert!(!email.delivered);
        assert!(email.error.as_deref().unwrap().contains("smtp down"));
    }

    #[tokio::test]
    async fn leader_without_email_gets_note_only() {
        let outbox = Arc::new(Outbox::default());
        let team = team(Some(leader(None, None)));

        let outcome = notifier(&outbox)
            .notify_leader(&ticket(), Some(&team), true, &mut NotifyGuard::default())
            .await;

        assert_eq!(outcome, NotificationOutcome::Dispatched {
            email: false,
            note: true
        });
        assert!(outbox.mails.lock().unwrap().is_empty());
        assert_eq!(outbox.notes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn configured_template_is_used() {
        let outbox = Arc::new(Outbox::default());
        let config = NotificationsConfig {
            default_lang: None,
            template: Some(MessageTemplate {
                subject: "[{{kind}}] {{ticket}} for {{team}}".into(),
                body: "Hi {{leader}}, {{customer}} wrote in.".into(),
            }),
        };
        let notifier = LeaderNotifier::from_config(outbox.clone(), outbox.clone(), &config);
        let team = team(Some(leader(Some("lea@wavext.io"), None)));

        notifier
            .notify_leader(&ticket(), Some(&team), true, &mut NotifyGuard::default())
            .await;

        let mails = outbox.mails.lock().unwrap();
        assert_eq!(mails[0].subject, "[Internal] HT00042 for Internal Helpdesk");
        assert_eq!(mails[0].body, "Hi Lea, Ana wrote in.");
        assert_eq!(outbox.notes.lock().unwrap()[0].body, "Hi Lea, Ana wrote in.");
    }

    #[tokio::test]
    async fn broken_template_fails_each_channel_without_panicking() {
        let outbox = Arc::new(Outbox::default());
        let notifier = notifier(&outbox).with_template(Some(MessageTemplate {
            subject: "{{nope}}".into(),
            body: String::new(),
        }));
        let team = team(Some(leader(Some("lea@wavext.io"), None)));

        let outcome = notifier
            .notify_leader(&ticket(), Some(&team), true, &mut NotifyGuard::default())
            .await;

        assert_eq!(outcome, NotificationOutcome::Dispatched {
            email: false,
            note: false
        });
    }
}
