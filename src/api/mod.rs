//! API handlers for the catalog endpoints

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use serde::Serialize;
use utoipa::ToSchema;

/// A record paired with its form pre-selection state. Built here at the
/// presentation boundary; the workflow layer never carries selection flags.
#[derive(Serialize, ToSchema)]
pub struct Selectable<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub record: T,
    pub is_selected: bool,
}
