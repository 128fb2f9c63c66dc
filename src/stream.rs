//! Lazy, possibly infinite streams with fair interleaving.
//!
//! A stream is pulled one step at a time. A step either produces a value, makes
//! progress without producing one (a suspension), or finds the stream exhausted.
//! Suspensions are the only points where work on one branch of the search yields
//! to another, and forcing them from a loop keeps native stack depth bounded no
//! matter how deep the search goes.
//!
//! Two combinators carry the fairness guarantees:
//!
//! - [`Stream::plus`] alternates between its operands step by step, so a finite
//!   answer on one side is reached even if the other side never ends.
//! - [`Stream::bind`] keeps every stream spawned by its continuation in an active
//!   set and advances each of them once per round, so an infinite sub-search
//!   cannot starve the ones spawned after it.

use log::trace;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A lazy sequence of values
pub enum Stream<T> {
    /// No further values
    Exhausted,
    /// A value followed by the rest of the stream
    Produced(T, Tail<T>),
    /// Work that has not been done yet; forcing it yields the stream it stands for
    Suspended(Box<dyn FnOnce() -> Stream<T>>),
}

/// Outcome of advancing a stream by exactly one step
#[derive(Debug)]
pub enum Step<T> {
    /// A value was produced
    Yield(T, Stream<T>),
    /// A suspension was forced without producing a value
    Pending(Stream<T>),
    /// The stream is exhausted
    Done,
}

impl<T> Stream<T> {
    /// The stream without values
    #[must_use]
    pub fn empty() -> Self {
        Stream::Exhausted
    }

    /// The stream holding exactly `value`
    #[must_use]
    pub fn unit(value: T) -> Self {
        Stream::cons(value, Stream::Exhausted)
    }

    /// Prepend `value` to `rest`
    #[must_use]
    pub fn cons(value: T, rest: Self) -> Self {
        Stream::Produced(value, Tail::new(rest))
    }

    /// Returns true if the stream is known to hold no further values
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Stream::Exhausted)
    }

    /// Advance the stream by one step
    #[must_use]
    pub fn step(self) -> Step<T> {
        match self {
            Stream::Exhausted => Step::Done,
            Stream::Produced(value, rest) => Step::Yield(value, rest.into_stream()),
            Stream::Suspended(thunk) => Step::Pending(thunk()),
        }
    }

    /// Pull at most `n` values.
    ///
    /// Stops as soon as `n` values are produced; nothing past the `n`-th value is forced.
    #[must_use]
    pub fn take(self, n: usize) -> Vec<T> {
        self.into_iter().take(n).collect()
    }

    /// Pull every value. Does not return if the stream is infinite.
    #[must_use]
    pub fn take_all(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T: 'static> Stream<T> {
    /// Defer building a stream until it is stepped
    #[must_use]
    pub fn suspend(thunk: impl FnOnce() -> Stream<T> + 'static) -> Self {
        Stream::Suspended(Box::new(thunk))
    }

    /// Fair union of two streams.
    ///
    /// Values are taken alternately from both operands. A suspension counts as a
    /// turn, so neither operand can monopolise the union.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        let mut produced = Vec::new();
        let (mut current, mut next) = (self, other);
        let tail = loop {
            match current {
                Stream::Exhausted => break next,
                Stream::Produced(value, rest) => {
                    produced.push(value);
                    current = std::mem::replace(&mut next, rest.into_stream());
                }
                Stream::Suspended(thunk) => break Stream::suspend(move || next.plus(thunk())),
            }
        };
        Stream::prepend(produced, tail)
    }

    /// Fair flat-map.
    ///
    /// Every value of this stream (the seed) is passed to `continuation`, and the
    /// resulting streams are interleaved round-robin: each round advances the seed
    /// and every live spawned stream by one step. Exhausted streams are dropped;
    /// the result ends once the seed and all spawned streams are exhausted.
    #[must_use]
    pub fn bind<U: 'static>(self, continuation: impl Fn(T) -> Stream<U> + 'static) -> Stream<U> {
        let interleaving = Interleaving {
            seed: Some(self),
            continuation: Rc::new(continuation),
            waiting: VecDeque::new(),
            advanced: VecDeque::new(),
            round_started: false,
        };
        Stream::suspend(move || interleaving.resume())
    }

    /// Apply `f` to every value
    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Stream<U> {
        self.map_shared(Rc::new(f))
    }

    fn map_shared<U: 'static>(self, f: Rc<dyn Fn(T) -> U>) -> Stream<U> {
        let mut mapped = Vec::new();
        let mut current = self;
        let tail = loop {
            match current {
                Stream::Exhausted => break Stream::Exhausted,
                Stream::Produced(value, rest) => {
                    mapped.push(f(value));
                    current = rest.into_stream();
                }
                Stream::Suspended(thunk) => break Stream::suspend(move || thunk().map_shared(f)),
            }
        };
        Stream::prepend(mapped, tail)
    }
}

impl<T> Stream<T> {
    /// Put `values` in front of `tail`, first value first
    fn prepend(values: Vec<T>, tail: Self) -> Self {
        values
            .into_iter()
            .rev()
            .fold(tail, |rest, value| Stream::cons(value, rest))
    }
}

/// The rest of a stream after a produced value.
///
/// Dropping a long run of produced values unlinks it in a loop rather than one
/// nested drop per value.
pub struct Tail<T>(Option<Box<Stream<T>>>);

impl<T> Tail<T> {
    fn new(stream: Stream<T>) -> Self {
        Self(Some(Box::new(stream)))
    }

    /// The remaining stream
    #[must_use]
    pub fn into_stream(mut self) -> Stream<T> {
        self.0.take().map_or(Stream::Exhausted, |stream| *stream)
    }

    fn peek(&self) -> Option<&Stream<T>> {
        self.0.as_deref()
    }
}

impl<T> Drop for Tail<T> {
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(stream) = next {
            next = match *stream {
                Stream::Produced(_, mut rest) => rest.0.take(),
                Stream::Exhausted | Stream::Suspended(_) => None,
            };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tail<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(stream) => stream.fmt(f),
            None => write!(f, "()"),
        }
    }
}

/// Scheduler state of [`Stream::bind`]
struct Interleaving<T, U> {
    seed: Option<Stream<T>>,
    continuation: Rc<dyn Fn(T) -> Stream<U>>,
    /// Spawned streams still to be advanced in the current round
    waiting: VecDeque<Stream<U>>,
    /// Streams for the next round: the newest spawn first, then survivors in order
    advanced: VecDeque<Stream<U>>,
    round_started: bool,
}

impl<T: 'static, U: 'static> Interleaving<T, U> {
    /// Run the current round until it produces a value or completes
    fn resume(mut self) -> Stream<U> {
        if !self.round_started {
            self.round_started = true;
            if let Some(seed) = self.seed.take() {
                match seed.step() {
                    Step::Done => {}
                    Step::Pending(rest) => self.seed = Some(rest),
                    Step::Yield(value, rest) => {
                        self.seed = Some(rest);
                        self.advanced.push_back((self.continuation)(value));
                    }
                }
            }
        }

        while let Some(stream) = self.waiting.pop_front() {
            match stream.step() {
                Step::Done => {}
                Step::Pending(rest) => self.advanced.push_back(rest),
                Step::Yield(value, rest) => {
                    self.advanced.push_back(rest);
                    return Stream::cons(value, Stream::suspend(move || self.resume()));
                }
            }
        }

        std::mem::swap(&mut self.waiting, &mut self.advanced);
        self.round_started = false;
        if self.seed.is_none() && self.waiting.is_empty() {
            return Stream::Exhausted;
        }
        trace!("interleaving round done, {} streams active", self.waiting.len());
        Stream::suspend(move || self.resume())
    }
}

impl<T> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Stream::prepend(iter.into_iter().collect(), Stream::Exhausted)
    }
}

impl<T> IntoIterator for Stream<T> {
    type Item = T;
    type IntoIter = StreamIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        StreamIter(self)
    }
}

/// Iterator pulling values out of a [`Stream`], forcing suspensions as needed
pub struct StreamIter<T>(Stream<T>);

impl<T> Iterator for StreamIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            match std::mem::replace(&mut self.0, Stream::Exhausted).step() {
                Step::Done => return None,
                Step::Pending(rest) => self.0 = rest,
                Step::Yield(value, rest) => {
                    self.0 = rest;
                    return Some(value);
                }
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StreamIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StreamIter").field(&self.0).finish()
    }
}

impl<T: PartialEq> PartialEq for Stream<T> {
    /// Compares materialised values; suspensions never compare equal
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (Some(self), Some(other));
        loop {
            match (left, right) {
                (None | Some(Stream::Exhausted), None | Some(Stream::Exhausted)) => return true,
                (Some(Stream::Produced(a, x)), Some(Stream::Produced(b, y))) if a == b => {
                    left = x.peek();
                    right = y.peek();
                }
                _ => return false,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut cursor = Some(self);
        let mut first = true;
        while let Some(stream) = cursor {
            match stream {
                Stream::Exhausted => break,
                Stream::Suspended(_) => {
                    write!(f, "{}...", if first { "" } else { " " })?;
                    break;
                }
                Stream::Produced(value, rest) => {
                    write!(f, "{}{value:?}", if first { "" } else { " " })?;
                    first = false;
                    cursor = rest.peek();
                }
            }
        }
        write!(f, ")")
    }
}
