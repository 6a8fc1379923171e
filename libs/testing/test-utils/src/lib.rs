//! Shared test utilities for the todo workspace
//!
//! - `TestDatabase`: a migrated database that lives as long as the test
//!   (in-memory SQLite by default, a Postgres container with the `postgres`
//!   feature)
//! - `TestDataBuilder`: deterministic todo descriptions per test
//! - `assertions`: small assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestDatabase};
//!
//! #[tokio::test]
//! async fn my_repository_test() {
//!     let db = TestDatabase::sqlite().await;
//!     let builder = TestDataBuilder::from_test_name("my_repository_test");
//!
//!     let description = builder.description("first");
//!     // SqlTodoRepository::new(db.connection())
//! }
//! ```

mod database;

pub use database::TestDatabase;

/// Deterministic test data, seeded from the test name
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name so two runs of the same test see the same data
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A todo description unique to this test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.description("groceries"), "todo-7-groceries");
    /// ```
    pub fn description(&self, suffix: &str) -> String {
        format!("todo-{}-{}", self.seed, suffix)
    }

    /// `count` distinct descriptions, in creation order
    pub fn descriptions(&self, count: usize) -> Vec<String> {
        (0..count).map(|i| self.description(&i.to_string())).collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert `later > earlier` with both values in the failure message
    pub fn assert_strictly_after<T: PartialOrd + std::fmt::Debug>(
        later: T,
        earlier: T,
        context: &str,
    ) {
        assert!(
            later > earlier,
            "{}: expected {:?} to be after {:?}",
            context,
            later,
            earlier
        );
    }
}
