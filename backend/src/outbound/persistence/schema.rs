//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts with denormalised follow counters.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        role -> Varchar,
        full_name -> Nullable<Text>,
        about -> Nullable<Text>,
        profile_image -> Nullable<Text>,
        follower_count -> Int4,
        following_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    follows (follower_id, followee_id) {
        follower_id -> Uuid,
        followee_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    studies (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        image -> Nullable<Text>,
        /// Maintained when notes are filed under or removed from the study.
        note_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    notes (id) {
        id -> Uuid,
        user_id -> Uuid,
        study_id -> Nullable<Uuid>,
        title -> Text,
        description -> Nullable<Text>,
        is_private -> Bool,
        upvoted_count -> Int4,
        downvoted_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Explicit read grants on private notes.
    note_permissions (note_id, user_id) {
        note_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user favourite and saved flags.
    note_interactions (note_id, user_id) {
        note_id -> Uuid,
        user_id -> Uuid,
        is_favorited -> Bool,
        is_saved -> Bool,
    }
}

diesel::joinable!(notes -> users (user_id));
diesel::joinable!(notes -> studies (study_id));
diesel::joinable!(note_permissions -> notes (note_id));
diesel::joinable!(note_interactions -> notes (note_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    follows,
    studies,
    tags,
    notes,
    note_permissions,
    note_interactions,
);
