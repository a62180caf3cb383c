use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{SettingsFlags, UserSettings};

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub payment_status: bool,
    pub notification_enable: bool,
    pub new_user: bool,
}

impl From<SettingsRequest> for SettingsFlags {
    fn from(r: SettingsRequest) -> Self {
        Self {
            payment_status: r.payment_status,
            notification_enable: r.notification_enable,
            new_user: r.new_user,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    pub notification_enable: bool,
}

/// Settings as shown to the dashboard; `persisted` is false when no row
/// exists yet and the defaults are reported.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub user_id: Uuid,
    pub payment_status: bool,
    pub notification_enable: bool,
    pub new_user: bool,
    pub persisted: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl SettingsResponse {
    pub fn resolve(user_id: Uuid, stored: Option<UserSettings>) -> Self {
        match stored {
            Some(s) => s.into(),
            None => {
                let flags = SettingsFlags::default();
                Self {
                    user_id,
                    payment_status: flags.payment_status,
                    notification_enable: flags.notification_enable,
                    new_user: flags.new_user,
                    persisted: false,
                    updated_at: None,
                }
            }
        }
    }
}

impl From<UserSettings> for SettingsResponse {
    fn from(s: UserSettings) -> Self {
        let flags = SettingsFlags::from(&s);
        Self {
            user_id: s.user_id,
            payment_status: flags.payment_status,
            notification_enable: flags.notification_enable,
            new_user: flags.new_user,
            persisted: true,
            updated_at: Some(s.updated_at),
        }
    }
}
