//! Capability-probing bridge to the host's callout (notification) service.
//!
//! The service displays a titled, optionally dismissible message near an
//! anchor and may associate a command binding with it. What makes the bridge
//! interesting is not that logic — it is signature negotiation: newer hosts
//! expose an element-anchored method with an optional command binding, older
//! hosts a screen-point-anchored method with a required group/id pair, and
//! some hosts expose neither the service nor a recognizable shape.
//!
//! Policy, per invocation:
//!
//! - service absent → error log naming the contract, then no-op. Expected
//!   condition, never surfaced to the caller.
//! - no recognized shape → error log naming the shapes tried, then no-op.
//! - matched method fails → the error propagates unmodified. A service that
//!   exists but fails internally is a host malfunction worth surfacing.

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::host::{ContractId, HostService, HostServices};

/// Contract id the host's callout service is registered under.
pub const CALLOUT_SERVICE: ContractId =
    ContractId::new(Uuid::from_u128(0x7c1f4a9e_3d62_4b0a_9f1d_5f82c0a4e6b3));

/// The only client id the callout service accepts from this subsystem.
pub const CALLOUT_CLIENT_ID: Uuid = Uuid::from_u128(0x2b8e5d71_946c_4f3e_8a07_c39d14f7ab52);

/// Failure raised by a located callout method itself.
#[derive(Debug, Error)]
pub enum CalloutError {
    /// The host service accepted the call but failed to display the callout.
    #[error("host callout display failed: {0}")]
    Host(String),
}

/// Absolute screen coordinates. The zero point stands in when real screen
/// geometry is unavailable (headless harness).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

/// The UI element region a callout should point at, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl AnchorRegion {
    /// Screen point for point-anchored hosts: the midpoint of the region's
    /// top edge.
    pub fn to_screen_point(&self) -> ScreenPoint {
        ScreenPoint {
            x: i32::from(self.x) + i32::from(self.width) / 2,
            y: i32::from(self.y),
        }
    }
}

/// A host command the callout may be associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBinding {
    pub group: Uuid,
    pub id: u32,
}

impl CommandBinding {
    /// The "no command" pair older hosts expect in place of an absent
    /// binding: nil group, zero id.
    pub const NONE: CommandBinding = CommandBinding { group: Uuid::nil(), id: 0 };
}

/// One callout to display: identity, chrome text, dismissal behavior, and an
/// optional associated command.
#[derive(Debug, Clone)]
pub struct CalloutRequest {
    pub callout_id: Uuid,
    pub title: String,
    pub message: String,
    pub permanently_dismissible: bool,
    pub command: Option<CommandBinding>,
}

/// Callout shape exposed by newer hosts.
///
/// Anchored to a UI element region; the command binding travels as an
/// explicit `Option` inside the request.
pub trait CalloutApiV2: Send + Sync {
    fn request_callout_display(
        &self,
        client: Uuid,
        request: &CalloutRequest,
        anchor: AnchorRegion,
    ) -> Result<(), CalloutError>;
}

/// Callout shape exposed by older hosts.
///
/// Anchored to an absolute screen point; the command group/id pair is part
/// of the signature, so an absent binding is passed as
/// [`CommandBinding::NONE`].
pub trait CalloutApiV1: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn request_callout_display(
        &self,
        client: Uuid,
        callout_id: Uuid,
        title: &str,
        message: &str,
        permanently_dismissible: bool,
        anchor: ScreenPoint,
        command_group: Uuid,
        command_id: u32,
    ) -> Result<(), CalloutError>;
}

/// The known callout shapes, in descending preference order.
enum CalloutDispatch<'a> {
    ElementAnchored(&'a dyn CalloutApiV2),
    PointAnchored(&'a dyn CalloutApiV1),
}

/// Adapts a located service to the best shape it implements.
fn probe_callout(service: &dyn HostService) -> Option<CalloutDispatch<'_>> {
    service
        .callout_v2()
        .map(CalloutDispatch::ElementAnchored)
        .or_else(|| service.callout_v1().map(CalloutDispatch::PointAnchored))
}

/// Displays a callout near `anchor` through whichever callout shape the host
/// actually implements.
///
/// An absent service or unrecognized shape is logged and swallowed — both
/// are expected across host versions. An error from the matched method
/// itself propagates to the caller.
pub fn request_callout_display(
    services: &HostServices,
    request: &CalloutRequest,
    anchor: &AnchorRegion,
) -> Result<(), CalloutError> {
    let Some(service) = services.get(&CALLOUT_SERVICE) else {
        error!(contract = %CALLOUT_SERVICE, "host callout service is not available");
        return Ok(());
    };

    match probe_callout(service.as_ref()) {
        Some(CalloutDispatch::ElementAnchored(api)) => {
            api.request_callout_display(CALLOUT_CLIENT_ID, request, *anchor)
        }
        Some(CalloutDispatch::PointAnchored(api)) => {
            // Older hosts need a real screen point; in a headless harness
            // there is none, so the zero point stands in.
            let point = if services.is_headless() {
                ScreenPoint::default()
            } else {
                anchor.to_screen_point()
            };
            let command = request.command.unwrap_or(CommandBinding::NONE);
            api.request_callout_display(
                CALLOUT_CLIENT_ID,
                request.callout_id,
                &request.title,
                &request.message,
                request.permanently_dismissible,
                point,
                command.group,
                command.id,
            )
        }
        None => {
            error!(
                contract = %CALLOUT_SERVICE,
                tried = "element-anchored, screen-point-anchored",
                "host callout service exposes no recognized display signature"
            );
            Ok(())
        }
    }
}
