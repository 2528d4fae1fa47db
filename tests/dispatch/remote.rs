//! Remote exception transport: inbound exception-flagged frames and
//! outbound fault frames.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wirecall::{
    decode_fault, fault_frame, ActionRegistry, ActionReturn, ConnectionHandle, DispatchFault,
    Dispatcher, Filter, FilterSet, Frame, RemoteFault, RemoteFaultKind, ServiceDescriptor,
};

use crate::support::{entries, new_log, record, CountingActivator};

fn conn() -> ConnectionHandle {
    ConnectionHandle::new(1)
}

fn exception_frame(kind: RemoteFaultKind, message: &str) -> Frame {
    let body = serde_json::to_vec(&RemoteFault::new(kind, message)).unwrap();
    Frame::exception(0, body)
}

#[tokio::test]
async fn exception_frames_bypass_routing() {
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("svc").action(
        42,
        "none",
        &[],
        move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ActionReturn::None)
        },
    )])
    .unwrap();
    let absorb = Filter::new("absorb").on_exception(|exc| exc.mark_handled());
    let dispatcher = Dispatcher::new(
        registry,
        FilterSet::new().with(absorb),
        CountingActivator::new(),
    );

    // Even though the code matches a registered action, the exception flag
    // routes the frame to the exception pass instead.
    let mut frame = exception_frame(RemoteFaultKind::Action, "peer failed");
    frame.command_code = 42;
    let outbound = dispatcher.handle(frame, conn()).await.unwrap();
    assert!(outbound.is_none());
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn global_filters_observe_remote_faults() {
    let log = new_log();
    let observe = {
        let log = log.clone();
        Filter::new("observe").on_exception(move |exc| {
            record(&log, exc.fault().to_string());
            exc.mark_handled();
        })
    };
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("svc").action(
        1,
        "none",
        &[],
        |_, _| Ok(ActionReturn::None),
    )])
    .unwrap();
    let dispatcher = Dispatcher::new(
        registry,
        FilterSet::new().with(observe),
        CountingActivator::new(),
    );

    let frame = exception_frame(RemoteFaultKind::Unauthorized, "bad token");
    dispatcher.handle(frame, conn()).await.unwrap();
    assert_eq!(
        entries(&log),
        vec!["remote fault (unauthorized): bad token"]
    );
}

#[tokio::test]
async fn unobserved_remote_faults_are_fatal() {
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("svc").action(
        1,
        "none",
        &[],
        |_, _| Ok(ActionReturn::None),
    )])
    .unwrap();
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), CountingActivator::new());

    let err = dispatcher
        .handle(exception_frame(RemoteFaultKind::Binding, "bad args"), conn())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DispatchFault::Remote(RemoteFault::new(RemoteFaultKind::Binding, "bad args"))
    );
}

#[tokio::test]
async fn unknown_fault_kinds_decode_generically() {
    let frame = Frame::exception(0, br#"{"kind":"disk_on_fire","message":"help"}"#.to_vec());
    let decoded = decode_fault(&frame.body);
    assert_eq!(decoded.kind, RemoteFaultKind::Unknown);
    assert_eq!(decoded.message, "help");
}

#[test]
fn local_faults_encode_with_a_readable_message() {
    let fault = DispatchFault::Unauthorized("auth.token denied command 9: expired".into());
    let frame = fault_frame(9, &fault);
    assert!(frame.is_exception);

    let decoded = decode_fault(&frame.body);
    assert_eq!(decoded.kind, RemoteFaultKind::Unauthorized);
    assert!(decoded.message.contains("expired"));
}
