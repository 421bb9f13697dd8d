//! Discord channel sink over the REST API.
//!
//! Only plain bot-token REST calls are made (create / delete message). No
//! gateway connection is opened, so the bot shows as offline while posting.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use stockwatch_core::{Destination, MonitorSpec, StockVerdict};

use crate::alert::{watching_message, Alert, Announcement};
use crate::{Notifier, NotifyError};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Posts alerts as rich embeds to a Discord channel.
pub struct DiscordNotifier {
    client: Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("api_base", &self.api_base)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    embeds: [Embed<'a>; 1],
}

#[derive(Serialize)]
struct Embed<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField<'a>>,
}

#[derive(Serialize)]
struct EmbedField<'a> {
    name: &'static str,
    value: &'a str,
    inline: bool,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: String,
}

impl DiscordNotifier {
    /// Creates a notifier that talks to `api_base` (e.g.
    /// `https://discord.com/api/v10`) with the given bot token.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be constructed.
    pub fn new(api_base: &str, token: &str) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn messages_url(&self, destination: &Destination) -> String {
        format!("{}/channels/{}/messages", self.api_base, destination.as_str())
    }

    async fn create_message(
        &self,
        destination: &Destination,
        body: &CreateMessage<'_>,
    ) -> Result<CreatedMessage, NotifyError> {
        let response = self
            .client
            .post(self.messages_url(destination))
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<CreatedMessage>().await?)
    }
}

fn require_destination(destination: &Destination, spec: &MonitorSpec) -> Result<(), NotifyError> {
    if destination.is_empty() {
        return Err(NotifyError::MissingDestination(spec.friendly_name.clone()));
    }
    Ok(())
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(
        &self,
        destination: &Destination,
        verdict: &StockVerdict,
        spec: &MonitorSpec,
    ) -> Result<(), NotifyError> {
        require_destination(destination, spec)?;
        let alert = Alert::new(spec, verdict);
        let body = CreateMessage {
            embeds: [Embed {
                kind: "rich",
                title: &alert.title,
                url: Some(alert.url.as_str()),
                description: None,
                fields: vec![
                    EmbedField {
                        name: "Price",
                        value: &alert.price,
                        inline: true,
                    },
                    EmbedField {
                        name: "SKU",
                        value: &alert.sku,
                        inline: true,
                    },
                    EmbedField {
                        name: "Type",
                        value: &alert.item_type,
                        inline: true,
                    },
                ],
            }],
        };

        let created = self.create_message(destination, &body).await?;
        tracing::info!(
            monitor = %spec.friendly_name,
            channel = %destination,
            message_id = %created.id,
            "posted in-stock alert"
        );
        Ok(())
    }

    async fn announce(
        &self,
        destination: &Destination,
        spec: &MonitorSpec,
    ) -> Result<Option<Announcement>, NotifyError> {
        require_destination(destination, spec)?;
        let description = watching_message(spec);
        let body = CreateMessage {
            embeds: [Embed {
                kind: "rich",
                title: &spec.friendly_name,
                url: None,
                description: Some(description.as_str()),
                fields: Vec::new(),
            }],
        };

        let created = self.create_message(destination, &body).await?;
        Ok(Some(Announcement {
            destination: destination.clone(),
            message_id: created.id,
        }))
    }

    async fn retract(&self, announcement: &Announcement) -> Result<(), NotifyError> {
        let url = format!(
            "{}/{}",
            self.messages_url(&announcement.destination),
            announcement.message_id
        );
        let response = self
            .client
            .delete(url)
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await?;

        let status = response.status();
        // Already gone counts as retracted.
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}
