use std::collections::VecDeque;

/// Fixed-capacity history that evicts its oldest entry when full.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    items: VecDeque<T>,
    max_capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn with_capacity(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(1);
        Self {
            items: VecDeque::with_capacity(max_capacity),
            max_capacity,
        }
    }

    /// Appends an entry, returning the evicted one if the window was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.max_capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }
}
