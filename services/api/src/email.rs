//! Email notification for seller leads
//!
//! Sends the "sell us your car" submission to the dealership's operational
//! inbox over SMTP, with the uploaded photos attached. Photo bytes exist
//! only for the duration of the send; the store keeps the count alone.

use anyhow::Result;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use std::time::Duration;
use thiserror::Error;

use crate::models::NewSubmission;

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address
    pub from_address: String,
    /// Fixed operational inbox receiving the lead notifications
    pub contact_address: String,
    /// Send timeout in seconds
    pub send_timeout: u64,
}

impl SmtpConfig {
    /// Create a new SmtpConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SMTP_HOST`, `SMTP_PORT` (default: 587), `SMTP_USER`, `SMTP_PASS`
    /// - `SMTP_FROM`: Sender address
    /// - `CONTACT_EMAIL`: Recipient inbox for lead notifications
    /// - `SMTP_SEND_TIMEOUT`: Send timeout in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| anyhow::anyhow!("SMTP_HOST environment variable not set"))?;
        let port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let username = std::env::var("SMTP_USER")
            .map_err(|_| anyhow::anyhow!("SMTP_USER environment variable not set"))?;
        let password = std::env::var("SMTP_PASS")
            .map_err(|_| anyhow::anyhow!("SMTP_PASS environment variable not set"))?;
        let from_address = std::env::var("SMTP_FROM")
            .map_err(|_| anyhow::anyhow!("SMTP_FROM environment variable not set"))?;
        let contact_address = std::env::var("CONTACT_EMAIL")
            .map_err(|_| anyhow::anyhow!("CONTACT_EMAIL environment variable not set"))?;
        let send_timeout = std::env::var("SMTP_SEND_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(SmtpConfig {
            host,
            port,
            username,
            password,
            from_address,
            contact_address,
            send_timeout,
        })
    }
}

/// A photo uploaded with the contact form, forwarded as an attachment
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Errors that can occur when sending the lead notification
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the email message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid sender or recipient address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Attachment with an unusable content type
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// The SMTP conversation did not finish within the send timeout
    #[error("Email send timed out")]
    Timeout,
}

/// Email service for the lead notification sink
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    contact_address: String,
    send_timeout: Duration,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.send_timeout)))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            contact_address: config.contact_address.clone(),
            send_timeout: Duration::from_secs(config.send_timeout),
        })
    }

    /// Send the seller-lead notification with photo attachments
    ///
    /// A send that outlives the configured timeout is reported as
    /// `EmailError::Timeout`, distinct from an SMTP rejection.
    pub async fn send_submission(
        &self,
        submission: &NewSubmission,
        photos: &[PhotoAttachment],
    ) -> Result<(), EmailError> {
        let message = self.build_submission_message(submission, photos)?;
        match tokio::time::timeout(self.send_timeout, self.mailer.send(message)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(EmailError::Timeout),
        }
    }

    fn build_submission_message(
        &self,
        submission: &NewSubmission,
        photos: &[PhotoAttachment],
    ) -> Result<Message, EmailError> {
        let personal = &submission.personal;
        let vehicle = &submission.vehicle;

        let vin_line = vehicle
            .vin
            .as_deref()
            .map(|vin| format!("<p><strong>VIN:</strong> {vin}</p>"))
            .unwrap_or_default();

        let html = format!(
            "<h2>Nouvelle demande de vente de véhicule</h2>\
             <h3>Informations personnelles</h3>\
             <p><strong>Nom:</strong> {} {}</p>\
             <p><strong>Téléphone:</strong> {}</p>\
             <p><strong>Courriel:</strong> {}</p>\
             <p><strong>Adresse:</strong> {}, {}, {} {}</p>\
             <h3>Détails du véhicule</h3>\
             {}\
             <p><strong>Véhicule:</strong> {} {} {} {}</p>\
             <p><strong>Kilométrage:</strong> {} km</p>\
             <p><strong>Accidenté:</strong> {}</p>\
             <p><strong>Nombre de photos:</strong> {}</p>",
            personal.first_name,
            personal.last_name,
            personal.phone,
            personal.email,
            personal.address,
            personal.city,
            personal.province,
            personal.postal_code,
            vin_line,
            vehicle.year,
            vehicle.make,
            vehicle.model,
            vehicle.submodel,
            vehicle.mileage_km,
            if vehicle.is_accidented { "Oui" } else { "Non" },
            submission.photo_count,
        );

        let mut body = MultiPart::mixed().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html),
        );

        for photo in photos {
            let content_type = ContentType::parse(&photo.content_type)
                .or_else(|_| ContentType::parse("application/octet-stream"))
                .map_err(|_| EmailError::InvalidAttachment(photo.filename.clone()))?;
            body = body.singlepart(
                Attachment::new(photo.filename.clone()).body(photo.data.clone(), content_type),
            );
        }

        let message = Message::builder()
            .from(self.from_address.parse().map_err(|_| {
                EmailError::InvalidAddress(self.from_address.clone())
            })?)
            .to(self.contact_address.parse().map_err(|_| {
                EmailError::InvalidAddress(self.contact_address.clone())
            })?)
            .subject("Nouvelle demande de vente de véhicule - Millenium Auto")
            .multipart(body)?;

        Ok(message)
    }
}
