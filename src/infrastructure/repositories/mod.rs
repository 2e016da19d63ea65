pub mod in_memory_profile_repository;
pub mod pg_profile_repository;
pub mod profile_repository;

pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use pg_profile_repository::PgProfileRepository;
pub use profile_repository::{ProfileError, ProfileRepository};
