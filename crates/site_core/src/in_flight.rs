/// Resets an in-flight marker when dropped, so a request future that is
/// cancelled mid-await does not leave its page stuck in the busy state.
pub(crate) struct InFlight<'a, T: Default>(&'a mut T);

impl<'a, T: Default> InFlight<'a, T> {
    pub(crate) fn mark(slot: &'a mut T, value: T) -> Self {
        *slot = value;
        Self(slot)
    }
}

impl<T: Default> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        *self.0 = T::default();
    }
}
