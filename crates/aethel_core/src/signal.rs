//! Shared single-threaded signals
//!
//! A [`Signal`] is written by exactly one owner (usually the runtime) and read
//! by any number of consumers through [`ReadSignal`] handles. Consumers cannot
//! write back, which keeps values like the pointer position or the scroll
//! offset a one-way back-reference.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Writable signal
pub struct Signal<T: Copy> {
    cell: Rc<Cell<T>>,
}

impl<T: Copy> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }

    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    /// Read-only handle to the same value
    pub fn reader(&self) -> ReadSignal<T> {
        ReadSignal {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Copy + Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.get()).finish()
    }
}

/// Read-only view of a [`Signal`]
#[derive(Clone)]
pub struct ReadSignal<T: Copy> {
    cell: Rc<Cell<T>>,
}

impl<T: Copy> ReadSignal<T> {
    /// A reader that never changes (handy for tests and static configs)
    pub fn constant(value: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.get()).finish()
    }
}
