//! In-process host callout service and the startup announcement.
//!
//! revpeek is its own host, so the callout service located through the
//! capability bridge is implemented right here: the newer, element-anchored
//! shape, backed by the event bus. A callout request becomes an
//! `AppEvent::Callout` toast that the status area renders until its ticks
//! expire. Callers always go through the bridge; a host build carrying only
//! the point-anchored service swaps in without touching them.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use revpeek_core::host::callout::{
    request_callout_display, AnchorRegion, CalloutApiV2, CalloutError, CalloutRequest,
    CALLOUT_SERVICE,
};
use revpeek_core::host::{HostService, HostServices};

use crate::event::AppEvent;

/// Identity of the "review loaded" announcement callout.
const REVIEW_LOADED_CALLOUT: Uuid = Uuid::from_u128(0x5e0d_93a7_41c8_4f6b_a92d_17c4_e8b0_62f1);

/// What the UI needs to render one callout toast.
#[derive(Debug, Clone)]
pub struct CalloutNotice {
    pub title: String,
    pub message: String,
    pub permanently_dismissible: bool,
}

/// The terminal-host callout service: element-anchored shape only.
///
/// Anchors are cell regions in the terminal, so the element form is the
/// natural fit; there is no separate screen coordinate space to translate
/// into.
pub struct TerminalCalloutService {
    tx: UnboundedSender<AppEvent>,
}

impl CalloutApiV2 for TerminalCalloutService {
    fn request_callout_display(
        &self,
        _client: Uuid,
        request: &CalloutRequest,
        _anchor: AnchorRegion,
    ) -> Result<(), CalloutError> {
        let notice = CalloutNotice {
            title: request.title.clone(),
            message: request.message.clone(),
            permanently_dismissible: request.permanently_dismissible,
        };
        self.tx
            .send(AppEvent::Callout(notice))
            .map_err(|_| CalloutError::Host("event channel closed".into()))
    }
}

impl HostService for TerminalCalloutService {
    fn callout_v2(&self) -> Option<&dyn CalloutApiV2> {
        Some(self)
    }
}

/// Registers the terminal callout service under its contract id.
pub fn register(services: &mut HostServices, tx: UnboundedSender<AppEvent>) {
    services.register(CALLOUT_SERVICE, Arc::new(TerminalCalloutService { tx }));
}

/// Announces the loaded review near the annotation gutter.
///
/// Fired once after the first loader payload arrives. Bridge errors
/// propagate — the service lives in-process, so a failure here is a real
/// bug, not host skew.
pub fn announce_review(
    services: &HostServices,
    total_comments: usize,
    file_count: usize,
    gutter: AnchorRegion,
) -> Result<(), CalloutError> {
    let message = match (total_comments, file_count) {
        (0, _) => "No review comments found".to_owned(),
        (c, 1) => format!("{c} review comments in 1 file"),
        (c, f) => format!("{c} review comments in {f} files"),
    };
    let request = CalloutRequest {
        callout_id: REVIEW_LOADED_CALLOUT,
        title: "Inline review".to_owned(),
        message,
        permanently_dismissible: true,
        command: None,
    };
    request_callout_display(services, &request, &gutter)
}
