/// Move the element at `from` so it ends up at `to`. `to` past the end
/// clamps to the end. Returns false when `from` is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

pub fn move_item_by_value<T: PartialEq>(items: &mut Vec<T>, item: &T, to: usize) -> bool {
    match items.iter().position(|x| x == item) {
        Some(from) => move_item(items, from, to),
        None => false,
    }
}

pub fn remove_item<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    if index < items.len() {
        Some(items.remove(index))
    } else {
        None
    }
}

/// Remove the first element equal to `item`
pub fn remove_item_by_value<T: PartialEq>(items: &mut Vec<T>, item: &T) -> Option<T> {
    let index = items.iter().position(|x| x == item)?;
    Some(items.remove(index))
}
