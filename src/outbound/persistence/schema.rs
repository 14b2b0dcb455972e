//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Customer and admin accounts.
    users (id) {
        /// Primary key: integer surrogate identifier.
        id -> Int4,
        first_name -> Varchar,
        second_name -> Varchar,
        /// Unique login email.
        email -> Varchar,
        password_hash -> Varchar,
        /// Role string, constrained to 'customer' | 'admin'.
        role -> Varchar,
    }
}

diesel::table! {
    /// Purchasable course offerings.
    courses (id) {
        id -> Int4,
        name -> Varchar,
        description -> Nullable<Text>,
        /// Non-negative price, enforced by a CHECK constraint.
        price -> Float8,
    }
}

diesel::table! {
    /// Reusable lesson units.
    modules (id) {
        id -> Int4,
        title -> Varchar,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    /// Join table attaching modules to courses.
    course_modules (id) {
        id -> Int4,
        course_id -> Int4,
        module_id -> Int4,
    }
}

diesel::table! {
    /// Course bookings by customers.
    ///
    /// Carries a UNIQUE constraint on (user_id, course_id) so concurrent
    /// booking requests cannot create duplicate rows.
    subscriptions (id) {
        id -> Int4,
        user_id -> Int4,
        course_id -> Int4,
        special_requests -> Text,
        /// Status string, constrained to 'pending' | 'confirmed' | 'cancelled'.
        status -> Varchar,
        subscription_date -> Timestamptz,
    }
}

diesel::joinable!(course_modules -> courses (course_id));
diesel::joinable!(course_modules -> modules (module_id));
diesel::joinable!(subscriptions -> users (user_id));
diesel::joinable!(subscriptions -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    courses,
    modules,
    course_modules,
    subscriptions,
);
