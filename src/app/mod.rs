//! Application core: pure monitoring logic, zero I/O.
//!
//! Samples every probe once per tick, renders the results, and hands them
//! to the display, the BLE notifier and the event sink. All interaction
//! with hardware happens through **port traits** defined in [`ports`].

pub mod events;
pub mod format;
pub mod ports;
pub mod service;
