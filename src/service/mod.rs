//! CrudService: list/read/create/update/delete for one resource kind.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::parse_id;
