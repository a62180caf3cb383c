use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiResult;

/// Per-user flags edited from the user drawer.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserSettings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_status: bool,
    pub notification_enable: bool,
    pub new_user: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The three editable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsFlags {
    pub payment_status: bool,
    pub notification_enable: bool,
    pub new_user: bool,
}

impl Default for SettingsFlags {
    /// What an account without a settings row is treated as.
    fn default() -> Self {
        Self {
            payment_status: false,
            notification_enable: true,
            new_user: true,
        }
    }
}

impl From<&UserSettings> for SettingsFlags {
    fn from(s: &UserSettings) -> Self {
        Self {
            payment_status: s.payment_status,
            notification_enable: s.notification_enable,
            new_user: s.new_user,
        }
    }
}

const SETTINGS_COLUMNS: &str =
    "id, user_id, payment_status, notification_enable, new_user, created_at, updated_at";

impl UserSettings {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> ApiResult<Option<UserSettings>> {
        let row = sqlx::query_as::<_, UserSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM user_settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Writes all three flags, creating the row if needed.
    pub async fn upsert(db: &PgPool, user_id: Uuid, flags: SettingsFlags) -> ApiResult<UserSettings> {
        let row = sqlx::query_as::<_, UserSettings>(&format!(
            r#"
            INSERT INTO user_settings (user_id, payment_status, notification_enable, new_user)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
               SET payment_status = EXCLUDED.payment_status,
                   notification_enable = EXCLUDED.notification_enable,
                   new_user = EXCLUDED.new_user,
                   updated_at = now()
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(flags.payment_status)
        .bind(flags.notification_enable)
        .bind(flags.new_user)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Changes only the notification preference; a new row gets default flags otherwise.
    pub async fn set_notifications(db: &PgPool, user_id: Uuid, enabled: bool) -> ApiResult<UserSettings> {
        let defaults = SettingsFlags::default();
        let row = sqlx::query_as::<_, UserSettings>(&format!(
            r#"
            INSERT INTO user_settings (user_id, payment_status, notification_enable, new_user)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
               SET notification_enable = EXCLUDED.notification_enable,
                   updated_at = now()
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(defaults.payment_status)
        .bind(enabled)
        .bind(defaults.new_user)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
