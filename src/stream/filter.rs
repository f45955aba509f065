// ABOUTME: Typed filtering of heterogeneous event sequences
// ABOUTME: Narrows events to one message variant by matching on the enum tag

use crate::stream::events::Event;
use futures_util::{ready, Stream, StreamExt};
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extract one concrete type from a message enum
///
/// Implement this for each variant payload you want to filter on, or use
/// [`narrow_variants!`](crate::narrow_variants). Every type narrows to
/// itself, so filtering on the whole message enum keeps every message.
pub trait Narrow<M>: Sized {
    /// `Some` if `message` carries a `Self`
    fn narrow(message: M) -> Option<Self>;
}

impl<M> Narrow<M> for M {
    fn narrow(message: M) -> Option<Self> {
        Some(message)
    }
}

/// Anything a message can be pulled out of
pub trait MessageSource {
    /// Message type carried
    type Message;

    /// The carried message, or `None` for non-message elements
    fn into_message(self) -> Option<Self::Message>;
}

impl<M> MessageSource for Event<M> {
    type Message = M;

    fn into_message(self) -> Option<M> {
        Event::into_message(self)
    }
}

/// `None` stands in for a missing element and is skipped
impl<E: MessageSource> MessageSource for Option<E> {
    type Message = E::Message;

    fn into_message(self) -> Option<Self::Message> {
        self.and_then(MessageSource::into_message)
    }
}

/// Stream of `T` values narrowed out of a message source
///
/// Holds no state besides the wrapped source.
#[must_use = "streams do nothing unless polled"]
pub struct Narrowed<S, T> {
    inner: S,
    _target: PhantomData<fn() -> T>,
}

impl<S, T> Narrowed<S, T> {
    /// Wrap `inner`
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            _target: PhantomData,
        }
    }

    /// Unwrap the underlying source
    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn narrow_item<E, T>(item: E) -> Option<T>
where
    E: MessageSource,
    T: Narrow<E::Message>,
{
    item.into_message().and_then(T::narrow)
}

impl<S, T> Stream for Narrowed<S, T>
where
    S: Stream + Unpin,
    S::Item: MessageSource,
    T: Narrow<<S::Item as MessageSource>::Message>,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            match ready!(this.inner.poll_next_unpin(cx)) {
                Some(item) => {
                    if let Some(value) = narrow_item::<_, T>(item) {
                        return Poll::Ready(Some(value));
                    }
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

/// Iterator counterpart of [`filter_and_map`]
pub fn narrow_iter<T, I>(source: I) -> impl Iterator<Item = T>
where
    I: IntoIterator,
    I::Item: MessageSource,
    T: Narrow<<I::Item as MessageSource>::Message>,
{
    source.into_iter().filter_map(narrow_item::<_, T>)
}

/// Narrow `source` down to its `T` messages, preserving order
///
/// ```ignore
/// let chats = filter_and_map::<Chat, _>(events);
/// ```
pub fn filter_and_map<T, S>(source: S) -> Narrowed<S, T> {
    Narrowed::new(source)
}

/// Method form of [`filter_and_map`] for streams
pub trait NarrowExt: Stream + Sized {
    /// Keep only messages that narrow to `T`
    fn narrow<T>(self) -> Narrowed<Self, T> {
        Narrowed::new(self)
    }
}

impl<S: Stream> NarrowExt for S {}

/// Implement [`Narrow`] for tuple-variant payloads of a message enum
///
/// ```ignore
/// narrow_variants!(Inbound {
///     Chat => ChatMessage,
///     Presence => PresenceUpdate,
/// });
/// ```
#[macro_export]
macro_rules! narrow_variants {
    ($enum:ident { $($variant:ident => $target:ty),+ $(,)? }) => {
        $(
            impl $crate::Narrow<$enum> for $target {
                fn narrow(message: $enum) -> ::std::option::Option<Self> {
                    #[allow(unreachable_patterns)]
                    match message {
                        $enum::$variant(inner) => ::std::option::Option::Some(inner),
                        _ => ::std::option::Option::None,
                    }
                }
            }
        )+
    };
}
