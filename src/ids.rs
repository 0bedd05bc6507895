use uuid::Uuid;

/// Source of fresh account identifiers.
///
/// Behind a trait so tests can substitute a deterministic generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Production generator backed by random v4 UUIDs.
#[derive(Clone)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Always yields the same identifier.
#[derive(Clone)]
pub struct FixedIds(pub Uuid);

impl IdGenerator for FixedIds {
    fn generate(&self) -> Uuid {
        self.0
    }
}
