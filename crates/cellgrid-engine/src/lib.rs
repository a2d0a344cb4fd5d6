//! cellgrid_engine - Formula references, arithmetic evaluation and relocation.

pub mod engine;
