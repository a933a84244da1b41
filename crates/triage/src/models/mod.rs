//! Domain models for mail entities

mod date;
mod message;
mod thread;

pub use date::MessageDate;
pub use message::{Category, EmailAddress, Message, MessageBuilder, MessageId};
pub use thread::{NO_SUBJECT, Thread, ThreadId};
