use crate::raytracing::types::TRAVERSAL_STACK_SIZE;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Node stack is full at {capacity} elements")]
pub struct StackOverflow {
    pub capacity: usize,
}

/// Fixed capacity stack living on the call stack, so no allocation happens during traversal
#[derive(Debug)]
pub struct NodeStack<T, const SIZE: usize = TRAVERSAL_STACK_SIZE> {
    data: [T; SIZE],
    count: usize,
}

impl<T, const SIZE: usize> Default for NodeStack<T, SIZE>
where
    T: Default + Copy,
{
    fn default() -> Self {
        Self {
            data: [T::default(); SIZE],
            count: 0,
        }
    }
}

impl<T, const SIZE: usize> NodeStack<T, SIZE>
where
    T: Default + Copy,
{
    pub fn is_empty(&self) -> bool {
        0 == self.count
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        SIZE
    }

    /// Pushes the given element on top of the stack, failing if the stack is already full
    pub fn push(&mut self, data: T) -> Result<(), StackOverflow> {
        if SIZE <= self.count {
            return Err(StackOverflow { capacity: SIZE });
        }
        self.data[self.count] = data;
        self.count += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if 0 == self.count {
            None
        } else {
            self.count -= 1;
            Some(self.data[self.count])
        }
    }

    pub fn last(&self) -> Option<&T> {
        if 0 == self.count {
            None
        } else {
            Some(&self.data[self.count - 1])
        }
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        if 0 == self.count {
            None
        } else {
            Some(&mut self.data[self.count - 1])
        }
    }
}
