//! Inbound message protocol: one plain string per message from page script.

use crate::console::ConsoleLevel;

pub const PULL_TO_REFRESH: &str = "PULL_TO_REFRESH";
pub const SHOW_OSK: &str = "SHOW_OSK";
pub const EXIT_KIOSK: &str = "EXIT_KIOSK";

/// A decoded inbound message. Borrows from the raw body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage<'a> {
    PullToRefresh,
    ShowKeyboard,
    Exit,
    /// `LEVEL: text` forwarded from the page console. `raw` is the whole body.
    Console {
        level: ConsoleLevel,
        text: &'a str,
        raw: &'a str,
    },
    Unknown(&'a str),
}

impl<'a> InboundMessage<'a> {
    pub fn parse(body: &'a str) -> Self {
        match body {
            PULL_TO_REFRESH => InboundMessage::PullToRefresh,
            SHOW_OSK => InboundMessage::ShowKeyboard,
            EXIT_KIOSK => InboundMessage::Exit,
            _ => match body
                .split_once(": ")
                .and_then(|(prefix, text)| Some((ConsoleLevel::from_prefix(prefix)?, text)))
            {
                Some((level, text)) => InboundMessage::Console {
                    level,
                    text,
                    raw: body,
                },
                None => InboundMessage::Unknown(body),
            },
        }
    }
}
