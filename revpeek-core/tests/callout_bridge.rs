//! Capability probing and dispatch in the host callout bridge.
//!
//! Exercises: shape preference (element-anchored before point-anchored),
//! graceful no-op for absent services and unrecognized shapes, the nil
//! command pair on the point-anchored path, headless zero-point anchors,
//! and fault propagation from a matched method.

use std::sync::{Arc, Mutex};

use revpeek_core::host::callout::{
    request_callout_display, AnchorRegion, CalloutApiV1, CalloutApiV2, CalloutError,
    CalloutRequest, CommandBinding, ScreenPoint, CALLOUT_CLIENT_ID, CALLOUT_SERVICE,
};
use revpeek_core::host::{HostService, HostServices};
use uuid::Uuid;

fn sample_request(command: Option<CommandBinding>) -> CalloutRequest {
    CalloutRequest {
        callout_id: Uuid::from_u128(0xA11C_E5),
        title: "Inline review".into(),
        message: "Comments are shown in the gutter".into(),
        permanently_dismissible: true,
        command,
    }
}

fn sample_anchor() -> AnchorRegion {
    AnchorRegion { x: 10, y: 3, width: 20, height: 1 }
}

/// Host exposing only the newer, element-anchored shape.
#[derive(Default)]
struct ElementOnlyHost {
    calls: Mutex<Vec<(Uuid, AnchorRegion, Option<CommandBinding>)>>,
}

impl CalloutApiV2 for ElementOnlyHost {
    fn request_callout_display(
        &self,
        client: Uuid,
        request: &CalloutRequest,
        anchor: AnchorRegion,
    ) -> Result<(), CalloutError> {
        self.calls.lock().unwrap().push((client, anchor, request.command));
        Ok(())
    }
}

impl HostService for ElementOnlyHost {
    fn callout_v2(&self) -> Option<&dyn CalloutApiV2> {
        Some(self)
    }
}

/// Host exposing only the older, point-anchored shape.
#[derive(Default)]
struct PointOnlyHost {
    calls: Mutex<Vec<(ScreenPoint, Uuid, u32)>>,
}

impl CalloutApiV1 for PointOnlyHost {
    fn request_callout_display(
        &self,
        _client: Uuid,
        _callout_id: Uuid,
        _title: &str,
        _message: &str,
        _permanently_dismissible: bool,
        anchor: ScreenPoint,
        command_group: Uuid,
        command_id: u32,
    ) -> Result<(), CalloutError> {
        self.calls.lock().unwrap().push((anchor, command_group, command_id));
        Ok(())
    }
}

impl HostService for PointOnlyHost {
    fn callout_v1(&self) -> Option<&dyn CalloutApiV1> {
        Some(self)
    }
}

/// Host implementing both shapes; records which one was chosen.
#[derive(Default)]
struct DualShapeHost {
    element_calls: Mutex<usize>,
    point_calls: Mutex<usize>,
}

impl CalloutApiV2 for DualShapeHost {
    fn request_callout_display(
        &self,
        _client: Uuid,
        _request: &CalloutRequest,
        _anchor: AnchorRegion,
    ) -> Result<(), CalloutError> {
        *self.element_calls.lock().unwrap() += 1;
        Ok(())
    }
}

impl CalloutApiV1 for DualShapeHost {
    fn request_callout_display(
        &self,
        _client: Uuid,
        _callout_id: Uuid,
        _title: &str,
        _message: &str,
        _permanently_dismissible: bool,
        _anchor: ScreenPoint,
        _command_group: Uuid,
        _command_id: u32,
    ) -> Result<(), CalloutError> {
        *self.point_calls.lock().unwrap() += 1;
        Ok(())
    }
}

impl HostService for DualShapeHost {
    fn callout_v2(&self) -> Option<&dyn CalloutApiV2> {
        Some(self)
    }
    fn callout_v1(&self) -> Option<&dyn CalloutApiV1> {
        Some(self)
    }
}

/// Host that registered under the contract but implements no known shape.
struct ShapelessHost;

impl HostService for ShapelessHost {}

/// Host whose matched method fails internally.
struct FailingHost;

impl CalloutApiV2 for FailingHost {
    fn request_callout_display(
        &self,
        _client: Uuid,
        _request: &CalloutRequest,
        _anchor: AnchorRegion,
    ) -> Result<(), CalloutError> {
        Err(CalloutError::Host("display subsystem rejected the callout".into()))
    }
}

impl HostService for FailingHost {
    fn callout_v2(&self) -> Option<&dyn CalloutApiV2> {
        Some(self)
    }
}

#[test]
fn newer_shape_is_dispatched_with_the_element_anchor() {
    let host = Arc::new(ElementOnlyHost::default());
    let mut services = HostServices::new();
    services.register(CALLOUT_SERVICE, host.clone());

    let command = CommandBinding { group: Uuid::from_u128(7), id: 42 };
    request_callout_display(&services, &sample_request(Some(command)), &sample_anchor())
        .expect("element-anchored dispatch should succeed");

    let calls = host.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (client, anchor, cmd) = calls[0];
    assert_eq!(client, CALLOUT_CLIENT_ID);
    assert_eq!(anchor, sample_anchor(), "element anchor passed through untranslated");
    assert_eq!(cmd, Some(command), "newer shape keeps the binding optional");
}

#[test]
fn newer_shape_wins_when_both_are_implemented() {
    let host = Arc::new(DualShapeHost::default());
    let mut services = HostServices::new();
    services.register(CALLOUT_SERVICE, host.clone());

    request_callout_display(&services, &sample_request(None), &sample_anchor()).unwrap();

    assert_eq!(*host.element_calls.lock().unwrap(), 1);
    assert_eq!(*host.point_calls.lock().unwrap(), 0, "older shape never attempted");
}

#[test]
fn older_shape_receives_translated_point_and_nil_command_pair() {
    let host = Arc::new(PointOnlyHost::default());
    let mut services = HostServices::new();
    services.register(CALLOUT_SERVICE, host.clone());

    request_callout_display(&services, &sample_request(None), &sample_anchor()).unwrap();

    let calls = host.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (point, group, id) = calls[0];
    assert_eq!(point, ScreenPoint { x: 20, y: 3 }, "midpoint of the anchor's top edge");
    assert_eq!(group, Uuid::nil(), "absent binding becomes the nil group");
    assert_eq!(id, 0, "absent binding becomes the zero id");
}

#[test]
fn headless_registry_substitutes_the_zero_point() {
    let host = Arc::new(PointOnlyHost::default());
    let mut services = HostServices::headless();
    services.register(CALLOUT_SERVICE, host.clone());

    request_callout_display(&services, &sample_request(None), &sample_anchor()).unwrap();

    let (point, _, _) = host.calls.lock().unwrap()[0];
    assert_eq!(point, ScreenPoint::default(), "no real screen geometry in a harness");
}

#[test]
fn shapeless_service_is_logged_and_swallowed() {
    let mut services = HostServices::new();
    services.register(CALLOUT_SERVICE, Arc::new(ShapelessHost));

    let outcome = request_callout_display(&services, &sample_request(None), &sample_anchor());
    assert!(outcome.is_ok(), "unrecognized shape must never surface to the caller");
}

#[test]
fn absent_service_is_logged_and_swallowed() {
    let services = HostServices::new();
    let outcome = request_callout_display(&services, &sample_request(None), &sample_anchor());
    assert!(outcome.is_ok(), "a missing host service is an expected condition");
}

#[test]
fn matched_method_fault_propagates_to_the_caller() {
    let mut services = HostServices::new();
    services.register(CALLOUT_SERVICE, Arc::new(FailingHost));

    let outcome = request_callout_display(&services, &sample_request(None), &sample_anchor());
    match outcome {
        Err(CalloutError::Host(message)) => {
            assert!(message.contains("rejected"), "fault must arrive unmodified");
        }
        Ok(()) => panic!("a present-but-failing service indicates a host problem; must not be swallowed"),
    }
}
