pub mod todo_list;
pub mod user;
