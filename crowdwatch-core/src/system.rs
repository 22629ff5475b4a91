use crate::World;

/// One pass over the world, run once per tick by the [`crate::Scheduler`].
///
/// Systems run strictly one after another in registration order, so a
/// system can rely on everything registered before it having finished for
/// the current frame.
pub trait System: Send {
    /// Short name used in timing logs.
    fn name(&self) -> &'static str;

    fn run(&mut self, world: &mut World);
}
