//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. Rows are never deleted.
    users (id) {
        /// Opaque identifier, a UUID v4 string for accounts created here.
        id -> Varchar,
        /// Unique login email, compared exactly as stored.
        email -> Varchar,
        /// Encoded `sha256$<salt>$<digest>` password hash.
        password_hash -> Varchar,
        name -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks, each owned by exactly one user.
    tasks (id) {
        id -> Int8,
        /// Owner; never changes after insert.
        user_id -> Varchar,
        /// Uses the "C" collation so `ORDER BY title` is byte order.
        title -> Varchar,
        description -> Nullable<Text>,
        completed -> Bool,
        /// One of `high`, `medium`, `low`.
        priority -> Varchar,
        tags -> Array<Text>,
        /// Generated from `priority`: high 1, medium 2, low 3.
        priority_rank -> Int2,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
