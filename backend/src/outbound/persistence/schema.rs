//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login handle.
        username -> Varchar,
        /// Unique, lower-cased contact address.
        email -> Varchar,
        /// PHC-formatted password hash.
        password_hash -> Text,
        /// `regular` or `admin`.
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Items owned by users; rows cascade on owner deletion.
    items (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        price -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(items -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(items, users);
