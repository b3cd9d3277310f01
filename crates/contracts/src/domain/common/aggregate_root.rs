use super::EntityMetadata;

/// Root of an aggregate persisted by the backend.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    /// Lifecycle metadata (timestamps, version)
    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Index of the aggregate in the system, e.g. "a001"
    fn aggregate_index() -> &'static str;

    /// Collection name used for storage, e.g. "bill"
    fn collection_name() -> &'static str;

    /// Full system name, also the table name, e.g. "a001_bill"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Call before every write so timestamps and version follow the change
    fn before_write(&mut self) {
        self.metadata_mut().touch();
    }
}
