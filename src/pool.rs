// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A pool of reusable scratch values.
///
/// A compiled regex owns one pool per matching engine so that a single
/// `Regex` can be shared across threads while each search reuses thread
/// lists and capture buffers instead of allocating them.
pub struct Pool<T> {
    stack: Mutex<Vec<T>>,
    create: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Pool<T> {
    pub fn new(create: Box<dyn Fn() -> T + Send + Sync>) -> Pool<T> {
        Pool {
            stack: Mutex::new(vec![]),
            create,
        }
    }

    /// Takes a value from the pool, creating one if none is free. The value
    /// returns to the pool when the guard drops.
    pub fn get(&self) -> PoolGuard<'_, T> {
        let mut stack = self.stack.lock().unwrap_or_else(|e| e.into_inner());
        let value = stack.pop().unwrap_or_else(|| (self.create)());
        drop(stack);
        PoolGuard {
            pool: self,
            value: Some(value),
        }
    }

    fn put(&self, value: T) {
        let mut stack = self.stack.lock().unwrap_or_else(|e| e.into_inner());
        stack.push(value);
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pool(..)")
    }
}

pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    value: Option<T>,
}

impl<'a, T> Deref for PoolGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // The value is only vacated on drop.
        self.value.as_ref().unwrap()
    }
}

impl<'a, T> DerefMut for PoolGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().unwrap()
    }
}

impl<'a, T> Drop for PoolGuard<'a, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.put(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pool;

    #[test]
    fn values_are_reused() {
        let pool: Pool<Vec<u32>> = Pool::new(Box::new(|| Vec::with_capacity(8)));
        {
            let mut v = pool.get();
            v.push(42);
        }
        let v = pool.get();
        // The same allocation comes back; contents are the caller's problem.
        assert_eq!(&**v, &[42]);
    }
}
