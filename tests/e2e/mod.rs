// End-to-end tests for the voicequeue HTTP API
//
// Every test gets its own server on an ephemeral port, backed by an
// in-memory preferences store, a fresh job queue and an outbox in a
// temporary directory. Contexts are created and torn down through
// test-context lifecycle hooks, so tests run in parallel without sharing
// state.
//
// Pipeline tests additionally run a conversion worker with a fake online
// engine that writes the chunk text as its audio payload.
//
// PostgreSQL-backed tests share one testcontainers PostgreSQL instance and
// give each test its own freshly migrated database. They are skipped when no
// Docker daemon is reachable.

mod test_health;
mod test_jobs;
mod test_pg_preferences;
mod test_preferences;
