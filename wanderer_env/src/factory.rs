//! Physical object creation and destruction in the host world.

use crate::types::{PhysicalHandle, Position};

/// Creates and destroys fully simulated agent objects in the host world.
///
/// # Ownership
///
/// While an object exists the host owns it and has movement authority. The
/// caller only keeps the returned [`PhysicalHandle`], which it uses to read the
/// authoritative position and, eventually, to destroy the object.
///
/// # Object Flow
///
/// ```text
/// Manager                       Host
///   |-- create(pos) ------------->|  spawn object
///   |<------------ Some(handle) ---|
///   |-- position(handle) -------->|  every tick while physical
///   |<--------------- Some(pos) --|
///   |-- destroy(handle) --------->|  unload (not a kill)
/// ```
pub trait PhysicalAgentFactory {
    /// Spawns a physical agent at `position`.
    ///
    /// # Returns
    /// * `Some(handle)` - The object exists in the host world
    /// * `None` - No object was created (transient; the caller may retry)
    fn create(&mut self, position: Position) -> Option<PhysicalHandle>;

    /// Removes the object from the host world as an unload.
    ///
    /// Destroying an unknown handle is a no-op.
    fn destroy(&mut self, handle: PhysicalHandle);

    /// Returns the authoritative position of a live object.
    ///
    /// `None` when the host no longer knows the handle.
    fn position(&self, handle: PhysicalHandle) -> Option<Position>;
}
