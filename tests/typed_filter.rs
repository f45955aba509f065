mod common;

use common::{chat, event_stream, frame, presence, ChatMessage, Inbound, Presence};
use futures_util::stream;
use futures_util::StreamExt;
use wsplex::{filter_and_map, narrow_iter, CloseReason, ConnectionState, Event, NarrowExt, TransportEvent};

fn timeline() -> Vec<Event<Inbound>> {
    vec![
        Event::Open,
        Event::Message(Inbound::Chat(chat("ada", "A"))),
        Event::Message(Inbound::Presence(presence("bob", true))),
        Event::Message(Inbound::Chat(chat("ada", "A2"))),
        Event::Closed(CloseReason::new(1000, "")),
    ]
}

#[test]
fn test_filter_keeps_matching_messages_in_order() {
    let chats: Vec<ChatMessage> = narrow_iter::<ChatMessage, _>(timeline()).collect();
    let presences: Vec<Presence> = narrow_iter::<Presence, _>(timeline()).collect();

    assert_eq!(chats, vec![chat("ada", "A"), chat("ada", "A2")]);
    assert_eq!(presences, vec![presence("bob", true)]);
}

#[test]
fn test_filter_skips_missing_elements() {
    let input = vec![
        None,
        Some(Event::Message(Inbound::Chat(chat("ada", "kept")))),
        None,
        Some(Event::Open),
    ];

    let chats: Vec<ChatMessage> = narrow_iter::<ChatMessage, _>(input).collect();

    assert_eq!(chats, vec![chat("ada", "kept")]);
}

#[test]
fn test_whole_enum_matches_every_message() {
    let all: Vec<Inbound> = narrow_iter::<Inbound, _>(timeline()).collect();

    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_stream_filter_matches_iterator_filter() {
    let chats: Vec<ChatMessage> = filter_and_map::<ChatMessage, _>(stream::iter(timeline()))
        .collect()
        .await;

    assert_eq!(chats, vec![chat("ada", "A"), chat("ada", "A2")]);
}

#[tokio::test]
async fn test_stream_filter_skips_missing_elements() {
    let input = stream::iter(vec![
        None,
        Some(Event::Message(Inbound::Presence(presence("bob", false)))),
        None,
    ]);

    let presences: Vec<Presence> = input.narrow::<Presence>().collect().await;

    assert_eq!(presences, vec![presence("bob", false)]);
}

#[tokio::test]
async fn test_filter_composes_with_other_combinators() {
    let texts: Vec<String> = stream::iter(timeline())
        .narrow::<ChatMessage>()
        .map(|message| message.text)
        .filter(|text| futures_util::future::ready(text.ends_with('2')))
        .collect()
        .await;

    assert_eq!(texts, vec!["A2".to_string()]);
}

#[tokio::test]
async fn test_filter_over_live_event_stream() {
    let source = stream::iter(vec![
        TransportEvent::Open,
        frame(&Inbound::Presence(presence("bob", true))),
        frame(&Inbound::Chat(chat("ada", "one"))),
        frame(&Inbound::Chat(chat("ada", "two"))),
        TransportEvent::Closing {
            code: 1000,
            reason: String::new(),
        },
        frame(&Inbound::Chat(chat("ada", "after close"))),
    ]);

    let chats: Vec<ChatMessage> = event_stream(source, ConnectionState::new())
        .narrow::<ChatMessage>()
        .collect()
        .await;

    assert_eq!(chats, vec![chat("ada", "one"), chat("ada", "two")]);
}

#[tokio::test]
async fn test_same_input_gives_same_output() {
    let first: Vec<Presence> = stream::iter(timeline()).narrow::<Presence>().collect().await;
    let second: Vec<Presence> = stream::iter(timeline()).narrow::<Presence>().collect().await;

    assert_eq!(first, second);
}
