//! Render command handler.

use glance_core::config::Config;
use glance_core::display::{DisplaySurface, NotificationRecord};
use glance_core::format::{ClockSample, Formatter};

pub struct RenderOptions {
    pub surface: DisplaySurface,
    pub app: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub offset: u64,
}

impl RenderOptions {
    /// A notification when any field was given; otherwise none.
    fn notification(&self) -> Option<NotificationRecord> {
        if self.app.is_none() && self.title.is_none() && self.content.is_none() {
            return None;
        }
        Some(NotificationRecord::new(
            self.app.clone().unwrap_or_default(),
            self.title.clone().unwrap_or_default(),
            self.content.clone().unwrap_or_default(),
        ))
    }
}

pub fn run(config: &Config, options: &RenderOptions) {
    let formatter = Formatter::from_config(&config.display);
    let notification = options.notification();
    let text = formatter.format(
        options.surface,
        notification.as_ref(),
        options.offset,
        &ClockSample::now(),
    );
    println!("{text}");
}
