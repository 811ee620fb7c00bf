use std::time::Duration;

use log::warn;

use crate::core::{Individual, MoError};

/// An immutable snapshot of the algorithm state passed to the observers at the end of each
/// iteration.
pub struct IterationData<'a> {
    /// The algorithm name.
    pub algorithm_name: &'a str,
    /// The generation or iteration number.
    pub generation: usize,
    /// The number of function evaluations run so far.
    pub number_of_function_evaluations: usize,
    /// The time elapsed since the start of the run.
    pub elapsed: Duration,
    /// The current population.
    pub individuals: &'a [Individual],
}

/// A trait to implement a monitoring component receiving a read-only snapshot of the algorithm
/// state once per iteration.
pub trait Observer {
    /// The observer name, used in the log messages.
    ///
    /// return: `&str`
    fn name(&self) -> &str;

    /// Process the iteration snapshot.
    ///
    /// # Arguments
    ///
    /// * `data`: The algorithm state at the end of the iteration.
    ///
    /// returns: `Result<(), MoError>`
    fn update(&self, data: &IterationData) -> Result<(), MoError>;
}

/// The registry of observers attached to an algorithm. Observers are notified synchronously in
/// registration order; a failing observer is logged and never aborts the run.
#[derive(Default)]
pub struct Observable {
    /// The registered observers.
    observers: Vec<Box<dyn Observer>>,
}

impl Observable {
    /// Create a new registry with no observers.
    ///
    /// returns: `Observable`
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register a new observer.
    ///
    /// # Arguments
    ///
    /// * `observer`: The observer to register.
    pub fn register(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Unregister the observer with the given name. This does nothing if no observer with the
    /// name is registered.
    ///
    /// # Arguments
    ///
    /// * `name`: The name of the observer to remove.
    pub fn unregister(&mut self, name: &str) {
        self.observers.retain(|o| o.name() != name);
    }

    /// The number of registered observers.
    ///
    /// return: `usize`
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify all the observers in registration order. Errors are logged and swallowed so that
    /// monitoring never stops an optimisation run.
    ///
    /// # Arguments
    ///
    /// * `data`: The algorithm state at the end of the iteration.
    pub fn notify(&self, data: &IterationData) {
        for observer in &self.observers {
            if let Err(e) = observer.update(data) {
                warn!("The observer '{}' failed: {}", observer.name(), e);
            }
        }
    }
}
