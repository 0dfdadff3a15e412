//! Cross-module scenario tests.

pub(crate) mod support;

mod chat_flow;
