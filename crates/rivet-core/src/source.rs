//! The request abstraction the binder reads from.

/// Read access to the parts of a request that can feed an input struct.
///
/// Lookups return `None` when the name is absent. The binder treats
/// `Some("")` the same way: an empty value is "not provided".
///
/// Hosts that cannot expose raw headers can leave [`header`](Self::header)
/// at its default, which reads the generic named-value store; header-tagged
/// fields then only see what the host copied into that store.
pub trait RequestSource {
    /// The raw request body, possibly empty.
    fn body(&self) -> &[u8];

    /// A path variable by name.
    fn path_param(&self, name: &str) -> Option<&str>;

    /// The first query parameter with this name.
    fn query_param(&self, name: &str) -> Option<&str>;

    /// A request-scoped named value.
    fn value(&self, name: &str) -> Option<&str>;

    /// A header by name.
    fn header(&self, name: &str) -> Option<&str> {
        self.value(name)
    }
}
