// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP implementation of the Notifier trait via lettre.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use tavola_config::model::SmtpConfig;
use tavola_core::{
    AdapterType, EntityRecord, FulfillmentRequest, HealthStatus, Notifier, PluginAdapter,
    TavolaError,
};

use crate::render;

/// Email notifier backed by an async SMTP transport.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    send_timeout: Duration,
}

impl SmtpNotifier {
    /// Build a notifier from configuration.
    ///
    /// A configured host gets a STARTTLS relay (with credentials when both
    /// username and password are set); no host falls back to an unencrypted
    /// localhost transport for development setups.
    pub fn new(config: &SmtpConfig) -> Result<Self, TavolaError> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| TavolaError::Config(format!("smtp.from_address: {e}")))?;

        let transport = match &config.host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| TavolaError::Config(format!("smtp.host: {e}")))?
                    .port(config.port);
                if let (Some(username), Some(password)) = (&config.username, &config.password) {
                    builder =
                        builder.credentials(Credentials::new(username.clone(), password.clone()));
                }
                builder.build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost(),
        };

        Ok(Self {
            transport,
            from,
            send_timeout: Duration::from_secs(config.send_timeout_secs),
        })
    }

    fn recipient(&self, request: &FulfillmentRequest) -> Result<Mailbox, TavolaError> {
        request
            .contact_address
            .parse()
            .map_err(|_| TavolaError::MalformedAddress)
    }

    async fn send(&self, message: Message) -> Result<(), TavolaError> {
        match tokio::time::timeout(self.send_timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                debug!(code = %response.code(), "smtp send accepted");
                Ok(())
            }
            Ok(Err(e)) => Err(TavolaError::Notify {
                message: "smtp send failed".to_string(),
                source: Some(Box::new(e)),
            }),
            Err(_) => Err(TavolaError::Timeout {
                duration: self.send_timeout,
            }),
        }
    }

    fn build_message(
        &self,
        request: &FulfillmentRequest,
        subject: String,
        text: String,
        html: String,
    ) -> Result<Message, TavolaError> {
        let to = self.recipient(request)?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| TavolaError::Notify {
                message: "message assembly failed".to_string(),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl PluginAdapter for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TavolaError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            _ => Ok(HealthStatus::Unhealthy("smtp connection failed".to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), TavolaError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        request: &FulfillmentRequest,
        entities: &[EntityRecord],
    ) -> Result<(), TavolaError> {
        let now = Utc::now().with_timezone(request.dining_at.offset());
        let message = self.build_message(
            request,
            render::subject(request, entities.len()),
            render::render_text(request, entities, now),
            render::render_html(request, entities, now),
        )?;
        self.send(message).await?;
        info!(request_id = %request.request_id, entities = entities.len(), "recommendations sent");
        Ok(())
    }

    async fn notify_no_matches(&self, request: &FulfillmentRequest) -> Result<(), TavolaError> {
        let (text, html) = render::render_no_matches(request);
        let message =
            self.build_message(request, render::no_matches_subject(request), text, html)?;
        self.send(message).await?;
        info!(request_id = %request.request_id, "no-matches notice sent");
        Ok(())
    }
}
