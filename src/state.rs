use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::services::backend::Backend;
use crate::services::events::BookingEvent;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Box<dyn Backend>,
    pub events_tx: broadcast::Sender<BookingEvent>,
}
