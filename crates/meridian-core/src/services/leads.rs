//! Contact-form intake and the lead notification email.

use std::sync::Arc;

use crate::domain::{Lead, LeadSubmission, mask_email};
use crate::error::DomainError;
use crate::ports::{EmailMessage, Mailer};

/// Sender and recipients of lead notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAddresses {
    pub from: String,
    pub to: Vec<String>,
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the notification for a validated lead. Replies go to the submitter.
pub fn compose_notification(lead: &Lead, addresses: &NotificationAddresses) -> EmailMessage {
    let company = lead.company.as_deref().unwrap_or("Not provided");

    let text = format!(
        "New contact form submission\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Company: {company}\n\
         Interest: {interest}\n\n\
         Message:\n{message}\n",
        name = lead.name,
        email = lead.email,
        interest = lead.interest.label(),
        message = lead.message,
    );

    let html = format!(
        "<h2>New contact form submission</h2>\
         <table>\
         <tr><td><strong>Name</strong></td><td>{name}</td></tr>\
         <tr><td><strong>Email</strong></td><td><a href=\"mailto:{email}\">{email}</a></td></tr>\
         <tr><td><strong>Company</strong></td><td>{company}</td></tr>\
         <tr><td><strong>Interest</strong></td><td>{interest}</td></tr>\
         </table>\
         <h3>Message</h3>\
         <p style=\"white-space: pre-wrap\">{message}</p>",
        name = escape_html(&lead.name),
        email = escape_html(&lead.email),
        company = escape_html(company),
        interest = lead.interest.label(),
        message = escape_html(&lead.message),
    );

    EmailMessage {
        from: addresses.from.clone(),
        to: addresses.to.clone(),
        reply_to: Some(lead.email.clone()),
        subject: format!("New lead: {} ({})", lead.name, lead.interest.label()),
        html,
        text,
    }
}

/// Validates contact submissions and sends the notification email.
#[derive(Clone)]
pub struct LeadIntake {
    mailer: Arc<dyn Mailer>,
    addresses: NotificationAddresses,
}

impl LeadIntake {
    pub fn new(mailer: Arc<dyn Mailer>, addresses: NotificationAddresses) -> Self {
        Self { mailer, addresses }
    }

    pub fn email_enabled(&self) -> bool {
        self.mailer.is_enabled()
    }

    /// Accept a submission.
    ///
    /// Only validation can fail. Once the lead is valid the caller gets
    /// success whether or not the email goes out.
    pub async fn submit(&self, submission: LeadSubmission) -> Result<Lead, DomainError> {
        let lead = Lead::try_from(submission)?;
        tracing::info!(
            interest = %lead.interest,
            email = %mask_email(&lead.email),
            "Lead received"
        );

        if !self.mailer.is_enabled() {
            tracing::debug!("Email dispatch disabled, skipping lead notification");
            return Ok(lead);
        }

        let message = compose_notification(&lead, &self.addresses);
        if let Err(e) = self.mailer.send(&message).await {
            tracing::warn!(error = %e, "Failed to send lead notification");
        }

        Ok(lead)
    }
}
