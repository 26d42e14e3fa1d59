pub mod picarto;
pub mod pluzz;
