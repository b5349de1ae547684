use super::*;

fn client(allow: Vec<MessageType>) -> IntakeClient {
    let uri = Url::parse("ws://127.0.0.1:1/v1/receive/+1").unwrap();
    IntakeClient::new(uri, allow)
}

fn data_frame(body: &str) -> String {
    format!(
        r#"{{"envelope":{{"source":"+2","timestamp":1,"dataMessage":{{"message":"{}"}}}},"account":"+1"}}"#,
        body
    )
}

const TYPING_FRAME: &str = r#"{"envelope":{"typingMessage":{"action":"STARTED"}},"account":"+1"}"#;

#[test]
fn test_data_message_is_recorded() {
    let client = client(vec![MessageType::DataMessage]);
    assert_eq!(client.handle_frame(data_frame("a").as_bytes()).unwrap(), 1);
    assert_eq!(client.pop().unwrap().text(), Some("a"));
}

#[test]
fn test_typing_is_dropped_by_default_allow_set() {
    let client = client(vec![MessageType::DataMessage]);
    assert_eq!(client.handle_frame(TYPING_FRAME.as_bytes()).unwrap(), 0);
    assert!(client.pop().is_none());
}

#[test]
fn test_allow_set_matches_any_type() {
    let client = client(vec![MessageType::Typing, MessageType::Data]);
    client.handle_frame(TYPING_FRAME.as_bytes()).unwrap();
    client.handle_frame(data_frame("a").as_bytes()).unwrap();
    assert_eq!(client.queue().len(), 2);
}

#[test]
fn test_empty_allow_set_drops_everything() {
    let client = client(Vec::new());
    assert_eq!(client.handle_frame(data_frame("a").as_bytes()).unwrap(), 0);
}

#[test]
fn test_multiple_objects_per_frame() {
    let client = client(vec![MessageType::DataMessage]);
    let frame = format!("{}\n{}\n{}\n", data_frame("a"), TYPING_FRAME, data_frame("b"));

    assert_eq!(client.handle_frame(frame.as_bytes()).unwrap(), 2);
    let texts: Vec<_> = client
        .flush()
        .iter()
        .map(|m| m.text().unwrap_or_default().to_string())
        .collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn test_malformed_frame_keeps_earlier_messages() {
    let client = client(vec![MessageType::DataMessage]);
    let frame = format!("{} {{\"envelope\": ", data_frame("a"));

    let err = client.handle_frame(frame.as_bytes()).unwrap_err();
    assert!(err.offset > 0);
    assert_eq!(client.queue().len(), 1);
}

#[test]
fn test_non_object_frame_is_decode_error() {
    let client = client(vec![MessageType::DataMessage]);
    assert!(client.handle_frame(b"[1, 2]").is_err());
    assert!(client.handle_frame(b"not json").is_err());
    assert_eq!(client.handle_frame(b"   ").unwrap(), 0);
}

#[test]
fn test_null_fields_are_recorded() {
    let client = client(vec![MessageType::DataMessage]);
    let frames = [
        r#"{"envelope":{"source":"u-1","sourceNumber":null,"dataMessage":{"message":"hi"}},"account":"+1"}"#,
        r#"{"envelope":{"source":"u-1","sourceName":null,"dataMessage":{"message":"hi"}},"account":"+1"}"#,
        r#"{"envelope":{"source":"u-1","timestamp":null,"dataMessage":{"message":"hi","attachments":null}},"account":"+1"}"#,
        r#"{"envelope":{"source":"u-1","receiptMessage":{"timestamps":null},"dataMessage":{"message":"hi"}},"account":"+1"}"#,
    ];

    for frame in frames {
        assert_eq!(client.handle_frame(frame.as_bytes()).unwrap(), 1, "{frame}");
    }

    let messages = client.flush();
    assert_eq!(messages.len(), 4);
    for message in &messages {
        assert_eq!(message.text(), Some("hi"));
        assert_eq!(message.envelope.source_number, "");
        assert_eq!(message.envelope.source_name, "");
    }
    assert_eq!(messages[2].envelope.timestamp, 0);
    assert!(messages[2].envelope.data_message.as_ref().unwrap().attachments.is_empty());
    assert!(messages[3].envelope.receipt_message.as_ref().unwrap().timestamps.is_empty());
}

#[tokio::test]
async fn test_receive_loop_requires_connection() {
    let client = client(vec![MessageType::DataMessage]);
    assert!(matches!(
        client.receive_loop().await,
        Err(IntakeError::NotConnected)
    ));
}

#[tokio::test]
async fn test_close_without_connection() {
    let client = client(vec![MessageType::DataMessage]);
    assert!(client.close().await.is_ok());
}

#[tokio::test]
async fn test_connect_failure() {
    let client = client(vec![MessageType::DataMessage]);
    assert!(matches!(
        client.connect().await,
        Err(IntakeError::Connection(_))
    ));
}

#[tokio::test]
async fn test_recorded_message_reaches_observer() {
    use async_trait::async_trait;
    use sigrelay_protocols::NotifyError;
    use tokio::sync::mpsc;

    struct Capture(mpsc::UnboundedSender<NewMessage>);

    #[async_trait]
    impl MessageObserver for Capture {
        fn name(&self) -> &str {
            "capture"
        }

        async fn on_message(&self, event: &NewMessage) -> Result<(), NotifyError> {
            let _ = self.0.send(event.clone());
            Ok(())
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = client(vec![MessageType::DataMessage]);
    client.register_observer(Arc::new(Capture(tx)));

    client.handle_frame(TYPING_FRAME.as_bytes()).unwrap();
    client.handle_frame(data_frame("hello").as_bytes()).unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.message.text(), Some("hello"));
    assert_eq!(event.types, vec![MessageType::Data, MessageType::DataMessage]);
    assert_eq!(client.queue().len(), 1);
}
