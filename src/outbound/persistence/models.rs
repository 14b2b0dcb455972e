//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{course_modules, courses, modules, subscriptions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub second_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Changeset struct for profile updates; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserRowChanges<'a> {
    pub first_name: Option<&'a str>,
    pub second_name: Option<&'a str>,
    pub email: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Insertable struct for creating new course records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
}

/// Changeset struct for course updates; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = courses)]
pub(crate) struct CourseRowChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
}

/// Row struct for reading from the modules table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = modules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ModuleRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
}

/// Insertable struct for creating new module records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = modules)]
pub(crate) struct NewModuleRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
}

/// Insertable struct for linking a module to a course.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = course_modules)]
pub(crate) struct NewCourseModuleRow {
    pub course_id: i32,
    pub module_id: i32,
}

// ---------------------------------------------------------------------------
// Booking models
// ---------------------------------------------------------------------------

/// Row struct for reading from the subscriptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscriptionRow {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub special_requests: String,
    pub status: String,
    pub subscription_date: DateTime<Utc>,
}

/// Insertable struct for creating new bookings.
///
/// The status defaults to 'pending' and the timestamp to now() in the
/// database, so neither appears here.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct NewSubscriptionRow<'a> {
    pub user_id: i32,
    pub course_id: i32,
    pub special_requests: &'a str,
}

/// Changeset struct for booking updates; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = subscriptions)]
pub(crate) struct SubscriptionRowChanges<'a> {
    pub special_requests: Option<&'a str>,
    pub status: Option<&'a str>,
}
