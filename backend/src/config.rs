//! Process configuration, read once at startup from `ROLLCALL_*` variables.
//! Every default suits local development: sqlite file, filesystem object
//! store, console senders.

use std::env;
use std::path::PathBuf;

use crate::domain::credential::CredentialStyle;
use crate::domain::email::EmailConfig;
use crate::domain::notification_service::NotificationConfig;
use crate::domain::sms::SmsConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// sqlx connection string for the registration store.
    pub database_url: String,
    /// Filesystem root of the object store.
    pub objects_root: PathBuf,
    /// Base URL under which stored objects are served.
    pub public_base_url: String,
    /// SMTP settings; `None` routes email to the console sender.
    pub email: Option<EmailConfig>,
    /// SMS gateway settings; `None` routes texts to the console sender.
    pub sms: Option<SmsConfig>,
    pub style: CredentialStyle,
    pub notifications: NotificationConfig,
    /// Whether deleting a registrant also deletes its stored objects.
    pub cleanup_objects_on_delete: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let email = env::var("ROLLCALL_SMTP_SERVER").ok().map(|smtp_server| EmailConfig {
            smtp_server,
            smtp_port: env::var("ROLLCALL_SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            username: env::var("ROLLCALL_SMTP_USERNAME").unwrap_or_default(),
            password: env::var("ROLLCALL_SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("ROLLCALL_SMTP_FROM")
                .unwrap_or_else(|_| "registrations@localhost".to_string()),
            reply_to: env::var("ROLLCALL_SMTP_REPLY_TO").ok(),
        });

        let sms = env::var("ROLLCALL_SMS_GATEWAY_URL").ok().map(|gateway_url| SmsConfig {
            gateway_url,
            auth_token: env::var("ROLLCALL_SMS_AUTH_TOKEN").unwrap_or_default(),
            from: env::var("ROLLCALL_SMS_FROM").unwrap_or_default(),
        });

        let mut style = CredentialStyle::default();
        if let Ok(dark) = env::var("ROLLCALL_QR_DARK") {
            style.dark = dark;
        }
        if let Ok(light) = env::var("ROLLCALL_QR_LIGHT") {
            style.light = light;
        }

        let mut notifications = NotificationConfig::default();
        if let Ok(subject) = env::var("ROLLCALL_SMTP_SUBJECT") {
            notifications.email_subject = subject;
        }

        Self {
            listen_addr: env::var("ROLLCALL_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            database_url: env::var("ROLLCALL_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:rollcall.db".to_string()),
            objects_root: PathBuf::from(
                env::var("ROLLCALL_OBJECTS_DIR").unwrap_or_else(|_| "./objects".to_string()),
            ),
            public_base_url: env::var("ROLLCALL_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3000/assets".to_string()),
            email,
            sms,
            style,
            notifications,
            cleanup_objects_on_delete: env::var("ROLLCALL_CLEANUP_OBJECTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so overrides and defaults are asserted
    // from a single test.
    #[test]
    fn test_from_env_defaults_and_overrides() {
        env::set_var("ROLLCALL_ADDR", "0.0.0.0:8080");
        env::set_var("ROLLCALL_QR_DARK", "#000000");
        env::set_var("ROLLCALL_CLEANUP_OBJECTS", "true");

        let config = AppConfig::from_env();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.style.dark, "#000000");
        assert_eq!(config.style.light, "#ffffff");
        assert!(config.cleanup_objects_on_delete);

        assert_eq!(config.database_url, "sqlite:rollcall.db");
        assert_eq!(config.public_base_url, "http://127.0.0.1:3000/assets");
        assert!(config.email.is_none());
        assert!(config.sms.is_none());
        assert_eq!(config.notifications.email_subject, "Your check-in QR codes");

        env::remove_var("ROLLCALL_ADDR");
        env::remove_var("ROLLCALL_QR_DARK");
        env::remove_var("ROLLCALL_CLEANUP_OBJECTS");
    }
}
