pub mod array;
pub mod object;

pub use array::{move_item, move_item_by_value, remove_item, remove_item_by_value};
pub use object::{get_object_value, get_path, set_object_value, set_path, split_path};
