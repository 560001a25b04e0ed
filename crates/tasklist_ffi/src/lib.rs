//! Flutter-facing bindings for `tasklist_core`.

pub mod api;
