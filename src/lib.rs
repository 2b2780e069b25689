//! feedsweep - ephemeral timeline daemon
//!
//! Periodically reconciles a local view of a user's posted items against a
//! remote social-timeline service: fetches recent items, retains a bounded
//! in-memory window of them, deletes items older than the retention
//! threshold, and keeps itself alive on an idle-suspending host via
//! self-pings.

pub mod cache;
pub mod cli;
pub mod config;
pub mod keepalive;
pub mod scheduler;
pub mod timeline;
