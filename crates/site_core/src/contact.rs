//! Contact form relay: a JSON POST to a hosted form endpoint.

use std::time::{Duration, Instant};

use reqwest::{header, Client};
use shared::{
    error::{GatewayError, Operation},
    protocol::ContactMessage,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::{config::SiteSettings, in_flight::InFlight};

/// How long a success or error banner stays up after an attempt.
pub const STATUS_DISPLAY: Duration = Duration::from_secs(6);

#[derive(Clone)]
pub struct ContactRelay {
    http: Client,
    endpoint: Option<Url>,
}

impl ContactRelay {
    pub fn new(endpoint: &str) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(endpoint.trim()).map_err(|e| {
            GatewayError::unavailable(format!("invalid contact endpoint '{endpoint}': {e}"))
        })?;
        Ok(Self {
            http: Client::new(),
            endpoint: Some(endpoint),
        })
    }

    pub fn unconfigured() -> Self {
        Self {
            http: Client::new(),
            endpoint: None,
        }
    }

    pub fn from_settings(settings: &SiteSettings) -> Self {
        if !settings.contact_configured() {
            warn!("contact endpoint not configured; contact form disabled");
            return Self::unconfigured();
        }
        match Self::new(&settings.contact_endpoint) {
            Ok(relay) => relay,
            Err(err) => {
                warn!(error = %err, "contact endpoint rejected; contact form disabled");
                Self::unconfigured()
            }
        }
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    pub async fn send(&self, message: &ContactMessage) -> Result<(), GatewayError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(GatewayError::unavailable("contact endpoint not configured"));
        };
        let operation = Operation::SubmitContact;
        let response = self
            .http
            .post(endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .json(message)
            .send()
            .await
            .map_err(|e| GatewayError::service(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "contact relay rejected message");
            return Err(GatewayError::service(
                operation,
                format!("relay responded with status {status}"),
            ));
        }
        debug!(%status, "contact relay accepted message");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address must contain '@'")]
    InvalidEmail,
    #[error("a message is already being sent")]
    Busy,
    #[error(transparent)]
    Relay(#[from] GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

/// Contact page state. The status banner clears itself
/// [`STATUS_DISPLAY`] after the attempt settles.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub fields: ContactMessage,
    status: SubmitStatus,
    submitting: bool,
    settled_at: Option<Instant>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Status as of `now`.
    pub fn status_at(&self, now: Instant) -> SubmitStatus {
        match self.settled_at {
            Some(settled) if now.saturating_duration_since(settled) >= STATUS_DISPLAY => {
                SubmitStatus::Idle
            }
            _ => self.status,
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status_at(Instant::now())
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        let fields = [
            ("name", &self.fields.name),
            ("email", &self.fields.email),
            ("subject", &self.fields.subject),
            ("message", &self.fields.message),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        if !self.fields.email.contains('@') {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }

    /// Sends the form through `relay`. Success clears the fields; a relay
    /// failure keeps them so the visitor can try again.
    pub async fn submit(&mut self, relay: &ContactRelay) -> Result<(), ContactError> {
        if self.submitting {
            return Err(ContactError::Busy);
        }
        self.validate()?;

        let result = {
            let _in_flight = InFlight::mark(&mut self.submitting, true);
            relay.send(&self.fields).await
        };
        self.settled_at = Some(Instant::now());

        match result {
            Ok(()) => {
                info!("contact message sent");
                self.status = SubmitStatus::Success;
                self.fields = ContactMessage::default();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "contact message failed");
                self.status = SubmitStatus::Error;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
