//! Application state shared by every handler

use crate::services::media::MediaService;
use mediabox_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media: MediaService,
}

impl AppState {
    pub fn new(config: Config, media: MediaService) -> Self {
        Self { config, media }
    }
}
