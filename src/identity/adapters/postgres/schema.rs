//! Diesel schema for user lookups.

diesel::table! {
    /// User accounts managed by external administration.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Unique, lowercased email address.
        #[max_length = 254]
        email -> Varchar,
        /// Display name.
        #[max_length = 255]
        display_name -> Varchar,
        /// Role name.
        #[max_length = 20]
        role -> Varchar,
        /// Optional home department.
        #[max_length = 50]
        department -> Nullable<Varchar>,
        /// Superuser flag.
        is_superuser -> Bool,
    }
}
