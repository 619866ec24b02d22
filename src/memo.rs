//! Single-slot memoisation keyed by dependency identity.
//!
//! A [Memo] remembers the dependencies and output of its last evaluation and
//! recomputes only if a dependency is not the *same* as before. Sameness is
//! defined by [Dependency]: pointer identity for shared values (`Rc`), value
//! equality for scalars and bit equality for floats. Pipeline stages hand
//! their outputs downstream as `Rc`s, so an unchanged upstream output is
//! recognised in O(1) without comparing trees.

use crate::layout::{DrawingArea, Projection};
use crate::session::SelectorId;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};

// =#========================================================================#=
// DEPENDENCY (Trait)
// =#========================================================================T=
/// A value a memoised computation depends on.
pub trait Dependency: Clone {
    /// Returns whether `self` and `other` are the same input.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Dependency for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Dependency> Dependency for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! value_dependency {
    ($($t:ty),* $(,)?) => {
        $(
            impl Dependency for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_dependency!(bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char, String, Projection);

impl Dependency for f64 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Dependency for f32 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Dependency for DrawingArea {
    fn same(&self, other: &Self) -> bool {
        self.width.same(&other.width) && self.height.same(&other.height)
    }
}

macro_rules! tuple_dependency {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Dependency),+> Dependency for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    };
}

tuple_dependency!(A: 0);
tuple_dependency!(A: 0, B: 1);
tuple_dependency!(A: 0, B: 1, C: 2);
tuple_dependency!(A: 0, B: 1, C: 2, D: 3);

// =#========================================================================#=
// MEMO
// =#========================================================================$=
/// One cache slot: the last dependency tuple and the output computed from it.
///
/// # Example
/// ```
/// use phylograph::memo::Memo;
/// use phylograph::session::SelectorId;
/// use std::rc::Rc;
///
/// let mut memo: Memo<(Rc<str>, f64), f64> = Memo::new(SelectorId::BranchScale);
/// let name: Rc<str> = Rc::from("kiwi");
/// assert_eq!(memo.get_or_compute((name.clone(), 2.0), |(n, z)| n.len() as f64 * z), 8.0);
/// assert_eq!(memo.get_or_compute((name, 2.0), |_| unreachable!()), 8.0);
/// assert_eq!(memo.evaluations(), 1);
/// ```
#[derive(Debug)]
pub struct Memo<D, T> {
    selector: SelectorId,
    slot: Option<(D, T)>,
    evaluations: usize,
}

impl<D: Dependency, T: Clone> Memo<D, T> {
    /// Creates an empty slot for the given selector.
    pub fn new(selector: SelectorId) -> Self {
        Self {
            selector,
            slot: None,
            evaluations: 0,
        }
    }

    /// Returns the cached output if `deps` are the same as last time,
    /// otherwise computes, stores and returns a new output.
    pub fn get_or_compute(&mut self, deps: D, compute: impl FnOnce(&D) -> T) -> T {
        if let Some((cached_deps, output)) = &self.slot {
            if cached_deps.same(&deps) {
                trace!(selector = %self.selector, "cache hit");
                return output.clone();
            }
        }

        let start = Instant::now();
        let output = compute(&deps);
        self.evaluations += 1;
        debug!(
            selector = %self.selector,
            elapsed_us = start.elapsed().as_micros() as u64,
            evaluations = self.evaluations,
            "recomputed"
        );

        self.slot = Some((deps, output.clone()));
        output
    }

    /// Number of times this slot has been (re)computed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// The cached output, if any.
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref().map(|(_, output)| output)
    }

    /// Drops the cached value; the next request recomputes.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
