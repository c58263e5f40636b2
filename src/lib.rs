//! Telegram remote-control bridge for ADB devices.
//!
//! The interesting part of this crate is the connectivity core under
//! [`core::connectivity`]: the Bot API is blocked or throttled in some
//! networks, so the bridge resolves a working transport (direct, SOCKS5,
//! HTTP proxy, or one of a list of public proxies) before the command
//! loop ever starts talking to Telegram.

pub mod cli;
pub mod config;
pub mod core;
