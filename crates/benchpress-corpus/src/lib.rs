//! Benchmark corpus enumerators.
//!
//! Each module turns one benchmark's on-disk query layout into an ordered
//! list of engine instances. Order is deterministic and meaningful: some
//! suites encode semantic dependencies (a view created by one query and
//! dropped by a later one) in file order.

pub mod dsb;
pub mod job;
pub mod split;
pub mod tpch;
