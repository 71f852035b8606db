use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

const FLASH_KEY: &str = "_flashes";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Danger,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Danger => "danger",
        }
    }
}

/// A one-time notice queued in the session until the next rendered page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
}

pub fn push(session: &Session, level: Level, message: impl Into<String>) -> Result<(), AppError> {
    let mut queued: Vec<FlashMessage> = session.get(FLASH_KEY)?.unwrap_or_default();
    queued.push(FlashMessage {
        level,
        message: message.into(),
    });
    session.insert(FLASH_KEY, queued)?;
    Ok(())
}

/// Drains the queue.
pub fn take(session: &Session) -> Result<Vec<FlashMessage>, AppError> {
    let queued = session.get(FLASH_KEY)?.unwrap_or_default();
    session.remove(FLASH_KEY);
    Ok(queued)
}
