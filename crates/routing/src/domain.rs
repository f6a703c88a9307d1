use deskroute_common::types::Ticket;

/// The requester email routing should use: the email typed on the ticket,
/// else the linked contact record's email. Blank values count as absent.
pub fn resolve_email(ticket: &Ticket) -> Option<&str> {
    non_blank(ticket.contact_email.as_deref()).or_else(|| non_blank(ticket.contact_record_email()))
}

/// Lower-cased domain of the resolved requester email.
///
/// No validation happens: an address without `@` yields the whole string
/// and `user@` yields an empty domain. `None` only when there is no email.
pub fn resolve_domain(ticket: &Ticket) -> Option<String> {
    resolve_email(ticket).map(email_domain)
}

/// Everything after the last `@`, lower-cased.
pub fn email_domain(email: &str) -> String {
    let domain = match email.rfind('@') {
        Some(at) => &email[at + 1..],
        None => email,
    };
    domain.to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use {super::*, deskroute_common::types::Contact, rstest::rstest};

    fn contact(email: Option<&str>) -> Contact {
        Contact {
            name: "Ana".into(),
            email: email.map(str::to_string),
        }
    }

    #[rstest]
    #[case("a@wavext.io", "wavext.io")]
    #[case("Someone@WaveXT.IO", "wavext.io")]
    #[case("odd@name@Corp.Example", "corp.example")]
    #[case("no-at-sign.COM", "no-at-sign.com")]
    #[case("trailing@", "")]
    #[case("@bare.io", "bare.io")]
    fn extracts_domain(#[case] email: &str, #[case] expected: &str) {
        assert_eq!(email_domain(email), expected);
    }

    #[test]
    fn trailing_at_keeps_empty_domain() {
        let ticket = Ticket::new(1, "HT1").with_contact_email("user@");
        assert_eq!(resolve_domain(&ticket).as_deref(), Some(""));
    }

    #[test]
    fn ticket_email_wins_over_contact_record() {
        let ticket = Ticket::new(1, "HT1")
            .with_contact_email("a@ticket.io")
            .with_contact(contact(Some("b@record.io")));
        assert_eq!(resolve_email(&ticket), Some("a@ticket.io"));
        assert_eq!(resolve_domain(&ticket).as_deref(), Some("ticket.io"));
    }

    #[test]
    fn contact_record_used_when_ticket_email_missing_or_blank() {
        let ticket = Ticket::new(1, "HT1").with_contact(contact(Some("b@Record.io")));
        assert_eq!(resolve_domain(&ticket).as_deref(), Some("record.io"));

        let ticket = Ticket::new(1, "HT1")
            .with_contact_email("  ")
            .with_contact(contact(Some("b@record.io")));
        assert_eq!(resolve_domain(&ticket).as_deref(), Some("record.io"));
    }

    #[test]
    fn no_email_anywhere() {
        assert_eq!(resolve_domain(&Ticket::new(1, "HT1")), None);
        let ticket = Ticket::new(1, "HT1").with_contact(contact(None));
        assert_eq!(resolve_email(&ticket), None);
        assert_eq!(resolve_domain(&ticket), None);
    }
}
