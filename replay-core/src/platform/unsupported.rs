use crate::models::error::ReplayError;
use crate::models::events::ServiceEvent;
use crate::platform::Platform;
use crate::traits::native_service::{NativeService, ServiceContext};

/// Stand-in adapter for platforms without a replay backend.
///
/// Announces unavailability through the usual event path, so consumer
/// code behaves the same on unsupported hosts (editors, CI) without
/// platform conditionals.
pub struct UnsupportedService {
    platform: Platform,
    ctx: Option<ServiceContext>,
}

impl UnsupportedService {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ctx: None,
        }
    }

    fn unavailable_reason(&self) -> String {
        format!("recording API not available on {}", self.platform)
    }
}

impl NativeService for UnsupportedService {
    fn initialise(&mut self, ctx: ServiceContext) {
        ctx.events
            .emit(ServiceEvent::InitialiseFailed(self.unavailable_reason()));
        self.ctx = Some(ctx);
    }

    fn is_recording_available(&self) -> bool {
        false
    }

    fn is_recording(&self) -> bool {
        false
    }

    fn is_preview_available(&self) -> bool {
        false
    }

    fn is_camera_enabled(&self) -> bool {
        false
    }

    fn start_recording(&mut self, _microphone_enabled: bool) {
        if let Some(ctx) = &self.ctx {
            ctx.events
                .emit(ServiceEvent::RecordingFailed(self.unavailable_reason()));
        }
    }

    fn stop_recording(&mut self) {}

    fn preview(&mut self) -> bool {
        false
    }

    fn discard(&mut self) -> bool {
        false
    }

    fn preview_file_path(&self) -> Option<String> {
        None
    }

    fn save_preview(&mut self, _filename: Option<&str>) {
        if let Some(ctx) = &self.ctx {
            ctx.events.emit(ServiceEvent::PreviewSaved(Err(
                ReplayError::Unavailable(self.platform.to_string()),
            )));
        }
    }

    fn share_preview(&mut self, _text: Option<&str>, _subject: Option<&str>) {}
}
