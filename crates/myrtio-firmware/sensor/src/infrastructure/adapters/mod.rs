mod link;
mod messaging;
mod publisher;

pub(crate) use link::LinkRequester;
pub(crate) use messaging::MessagingAdapter;
pub(crate) use publisher::OutboxPublisher;
