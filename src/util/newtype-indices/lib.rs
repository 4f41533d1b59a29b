/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

//! Newtyped `usize` indices, and a `Vec` that can only be indexed by one of them.
//!
//! The point is to make it a type error to index a list of supercell atoms with
//! a primitive atom index (and vice versa).

use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut, Range};
use std::slice;

/// Represents some newtyped `usize` wrapper.
pub trait Idx: Copy + 'static + Eq + Ord + Hash + fmt::Debug + Send + Sync {
    fn new(idx: usize) -> Self;
    fn index(self) -> usize;
}

impl Idx for usize {
    #[inline]
    fn new(idx: usize) -> Self { idx }
    #[inline]
    fn index(self) -> usize { self }
}

#[macro_export]
macro_rules! newtype_index {
    ($type:ident) => (
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type(pub usize);

        impl $crate::Idx for $type {
            #[inline]
            fn new(value: usize) -> Self { $type(value) }

            #[inline]
            fn index(self) -> usize { self.0 }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    );
}

/// A `Vec` that uses newtype indices.
#[derive(Clone, PartialEq)]
pub struct IndexVec<I: Idx, T> {
    pub raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I: Idx, T: fmt::Debug> fmt::Debug for IndexVec<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

/// # Construction
impl<I: Idx, T> IndexVec<I, T> {
    #[inline]
    pub fn from_raw(raw: Vec<T>) -> Self {
        IndexVec { raw, _marker: PhantomData }
    }

    #[inline]
    pub fn new() -> Self { IndexVec::from_raw(Vec::new()) }

    #[inline]
    pub fn from_elem_n(elem: T, n: usize) -> Self
    where T: Clone,
    { IndexVec::from_raw(vec![elem; n]) }

    #[inline]
    pub fn push(&mut self, value: T) -> I {
        let index = I::new(self.raw.len());
        self.raw.push(value);
        index
    }
}

/// # Access
impl<I: Idx, T> IndexVec<I, T> {
    #[inline]
    pub fn len(&self) -> usize { self.raw.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.raw.is_empty() }

    #[inline]
    pub fn get(&self, index: I) -> Option<&T> { self.raw.get(index.index()) }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> { self.raw.iter() }

    #[inline]
    pub fn indices(&self) -> std::iter::Map<Range<usize>, fn(usize) -> I> {
        (0..self.len()).map(I::new as fn(usize) -> I)
    }

    #[inline]
    pub fn iter_enumerated(&self) -> impl ExactSizeIterator<Item=(I, &T)> + '_ {
        self.raw.iter().enumerate().map(|(i, x)| (I::new(i), x))
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T { &self.raw[index.index()] }
}

impl<I: Idx, T> IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut T { &mut self.raw[index.index()] }
}

impl<I: Idx, T> Default for IndexVec<I, T> {
    fn default() -> Self { IndexVec::new() }
}

impl<I: Idx, T> FromIterator<T> for IndexVec<I, T> {
    fn from_iter<Is: IntoIterator<Item=T>>(iter: Is) -> Self {
        IndexVec::from_raw(iter.into_iter().collect())
    }
}

impl<'a, I: Idx, T> IntoIterator for &'a IndexVec<I, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.raw.iter() }
}
