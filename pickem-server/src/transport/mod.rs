//! Inbound message-bus plumbing.

pub mod amqp;
