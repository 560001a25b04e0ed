//! View synchronization between the task store and a visual list.
//!
//! # Responsibility
//! - Project task records into visible rows and keep the summary current.
//! - Route row and top-level interactions back into the store.
//!
//! # Invariants
//! - Rows are correlated to records only through the `id -> Row` map.
//! - The surface holds display state only; the store stays canonical.

pub mod surface;
pub mod sync;
pub mod text_surface;
