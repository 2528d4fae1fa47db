//! End-to-end dispatch: routing, binding, invocation, response building.

use serde_json::{json, Value};
use wirecall::{
    ActionRegistry, ActionReturn, ConnectionHandle, DispatchFault, Dispatcher, FactoryActivator,
    FilterSet, Frame, ParamShape, Serializer, ServiceDescriptor,
};

use crate::support::{calculator_activator, calculator_service, request};

fn conn() -> ConnectionHandle {
    ConnectionHandle::new(1)
}

#[tokio::test]
async fn no_arg_action_responds_with_its_value() {
    // One action, command code 42, no filters, body returns 7.
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("fixed").action(
        42,
        "value",
        &[],
        |_, _| Ok(ActionReturn::Value(json!(7))),
    )])
    .unwrap();
    let activator = FactoryActivator::new().service("fixed", || Box::new(()));
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), activator);

    let outbound = dispatcher
        .handle(Frame::request(42, Vec::new()), conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outbound.command_code, 42);
    assert!(!outbound.is_exception);
    assert_eq!(outbound.body, b"7");
}

#[tokio::test]
async fn arguments_bind_against_declared_shapes() {
    let registry = ActionRegistry::register(vec![calculator_service()]).unwrap();
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), calculator_activator());

    let outbound = dispatcher
        .handle(request(42, json!([3, 4])), conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outbound.body, b"7");
}

#[tokio::test]
async fn unknown_command_code_is_fatal() {
    let registry = ActionRegistry::register(vec![calculator_service()]).unwrap();
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), calculator_activator());

    // No filters registered, so nothing can absorb the fault.
    let err = dispatcher
        .handle(Frame::request(99, Vec::new()), conn())
        .await
        .unwrap_err();
    assert_eq!(err, DispatchFault::CommandNotFound(99));
}

#[tokio::test]
async fn none_returning_actions_send_no_frame() {
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("sink").action(
        10,
        "none",
        &[ParamShape::Text],
        |_, _| Ok(ActionReturn::None),
    )])
    .unwrap();
    let activator = FactoryActivator::new().service("sink", || Box::new(()));
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), activator);

    let outbound = dispatcher
        .handle(request(10, json!(["payload"])), conn())
        .await
        .unwrap();
    assert!(outbound.is_none());
}

#[tokio::test]
async fn async_actions_resume_and_respond() {
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("deferred").action(
        20,
        "async",
        &[ParamShape::Integer],
        |_, ctx| {
            let doubled = ctx.arg_as::<i64>(0)? * 2;
            Ok(ActionReturn::pending(async move {
                tokio::task::yield_now().await;
                Ok(Some(json!(doubled)))
            }))
        },
    )])
    .unwrap();
    let activator = FactoryActivator::new().service("deferred", || Box::new(()));
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), activator);

    let outbound = dispatcher
        .handle(request(20, json!([21])), conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outbound.body, b"42");
}

/// Alternate codec: the whole body is one UTF-8 text argument, and string
/// results are written back raw.
struct PlainText;

impl Serializer for PlainText {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, DispatchFault> {
        match value {
            Value::String(s) => Ok(s.clone().into_bytes()),
            other => Ok(other.to_string().into_bytes()),
        }
    }

    fn bind(&self, body: &[u8], shapes: &[ParamShape]) -> Result<Vec<Value>, DispatchFault> {
        if shapes.len() != 1 || shapes[0] != ParamShape::Text {
            return Err(DispatchFault::Binding(
                "plain text bodies bind to exactly one text argument".into(),
            ));
        }
        let text = std::str::from_utf8(body)
            .map_err(|e| DispatchFault::Binding(e.to_string()))?;
        Ok(vec![Value::String(text.to_string())])
    }
}

#[tokio::test]
async fn the_codec_is_swappable() {
    let registry = ActionRegistry::register(vec![ServiceDescriptor::new("echo").action(
        30,
        "value",
        &[ParamShape::Text],
        |_, ctx| {
            let text: String = ctx.arg_as(0)?;
            Ok(ActionReturn::Value(json!(text.to_uppercase())))
        },
    )])
    .unwrap();
    let activator = FactoryActivator::new().service("echo", || Box::new(()));
    let dispatcher =
        Dispatcher::new(registry, FilterSet::new(), activator).with_serializer(PlainText);

    let outbound = dispatcher
        .handle(Frame::request(30, b"hello".to_vec()), conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outbound.body, b"HELLO");
}

#[tokio::test]
async fn arity_mismatch_is_a_binding_fault() {
    let registry = ActionRegistry::register(vec![calculator_service()]).unwrap();
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), calculator_activator());

    let err = dispatcher
        .handle(request(42, json!([3])), conn())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchFault::Binding(_)));
}

#[tokio::test]
async fn type_mismatch_is_a_binding_fault() {
    let registry = ActionRegistry::register(vec![calculator_service()]).unwrap();
    let dispatcher = Dispatcher::new(registry, FilterSet::new(), calculator_activator());

    let err = dispatcher
        .handle(request(42, json!([3, "four"])), conn())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchFault::Binding(_)));
}
