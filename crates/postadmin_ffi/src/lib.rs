//! Flutter-facing bindings over `postadmin_core`.

pub mod api;
