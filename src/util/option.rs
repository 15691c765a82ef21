pub(crate) trait OptionExtension<T> {
    /// Unwraps a link that the surrounding structure guarantees is present. Debug builds still
    /// check, so that a broken structure fails loudly in tests.
    ///
    /// # Safety
    /// The caller must guarantee that the value is [`Some`].
    unsafe fn assume_some(self) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    unsafe fn assume_some(self) -> T {
        debug_assert!(self.is_some(), "a link that must exist was missing");
        // SAFETY: The caller guarantees that the value is Some.
        unsafe { self.unwrap_unchecked() }
    }
}
